use anyhow::{bail, Result};
use odk_journal::VerifyResult;

pub fn verify(path: &str) -> Result<()> {
    match odk_journal::verify_chain(path)? {
        VerifyResult::Valid { lines } => {
            println!("journal_valid=true lines={lines}");
            Ok(())
        }
        VerifyResult::Broken { line, reason } => {
            println!("journal_valid=false line={line}");
            bail!("JOURNAL_BROKEN line {line}: {reason}")
        }
    }
}
