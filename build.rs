use anyhow::Result;
use vergen::EmitBuilder;

// VERGEN_GIT_SHA and VERGEN_GIT_DIRTY end up in the CLI's long version string.
fn main() -> Result<()> {
    EmitBuilder::builder()
        .git_sha(true)
        .git_dirty(false)
        .emit()?;
    Ok(())
}
