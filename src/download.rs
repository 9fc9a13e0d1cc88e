// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fetch a URL over HTTP into a local file, following a bounded number of redirects
// role: network helper
// inputs: source URL, target path
// outputs: target file written with the response body
// side_effects: network IO; truncates/creates the target file
// invariants: at most MAX_REDIRECTS redirects are followed; non-2xx responses are errors
// errors: Download (transport, status, redirect limit); Io when writing the target
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::Path;

use tracing::info;

use crate::error::{Result, TaskError};

pub const MAX_REDIRECTS: u32 = 5;

fn agent() -> ureq::Agent {
  ureq::Agent::config_builder().max_redirects(MAX_REDIRECTS).build().into()
}

pub fn download(url: &str, target: &Path) -> Result<u64> {
  info!("Downloading {} to {}", url, target.display());

  let fail = |reason: String| TaskError::Download { url: url.to_string(), reason };

  let mut resp = agent()
    .get(url)
    .header("User-Agent", "svn-release")
    .call()
    .map_err(|e| fail(e.to_string()))?;

  if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)?;
  }
  let mut out = std::fs::File::create(target)?;
  let written = std::io::copy(&mut resp.body_mut().as_reader(), &mut out)?;

  info!("done ({} bytes)", written);
  Ok(written)
}
