/// What to do with a block whose text is required but missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Emit a `malformed block: <kind>` line, record a warning, keep going.
    #[default]
    Placeholder,
    /// Stop at the first malformed block and return its error.
    Abort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub policy: MalformedPolicy,
    /// Prefix every block's output with a `Block Type: <kind>` line.
    pub annotate_kinds: bool,
}

impl RenderOptions {
    pub fn strict() -> Self {
        RenderOptions {
            policy: MalformedPolicy::Abort,
            ..Self::default()
        }
    }

    pub fn annotated(mut self) -> Self {
        self.annotate_kinds = true;
        self
    }
}
