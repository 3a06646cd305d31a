//! Confirmation of destructive actions

/// Asks the user to confirm before something is destroyed
pub trait Confirm {
    /// Return `true` to go ahead
    fn confirm(&self, prompt: &str) -> bool;
}

/// Confirms everything (`--yes`)
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

impl<F: Fn(&str) -> bool> Confirm for F {
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}
