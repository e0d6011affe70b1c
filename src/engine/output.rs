/// Auxiliary display surfaces the front-end owns. The engine only signals
/// that one became stale; the front-end pulls fresh data through the
/// session accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Map,
    Inventory,
    RoomItems,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OutputBlock {
    /// A log line. Inline markup passes through untouched.
    Text(String),
    /// Echo of a command the engine synthesized (e.g. from a panel click).
    Echo(String),
    /// Request to render an art reference in the art panel.
    Art(String),
    /// Request to blank the art panel.
    ArtClear,
    Refresh(Panel),
}

#[derive(Default, Debug)]
pub struct Output {
    pub blocks: Vec<OutputBlock>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn say(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.blocks.push(OutputBlock::Text(s));
        }
    }

    pub fn echo(&mut self, s: impl Into<String>) {
        let s = s.into();
        if !s.trim().is_empty() {
            self.blocks.push(OutputBlock::Echo(s));
        }
    }

    pub fn art(&mut self, art_ref: impl Into<String>) {
        let art_ref = art_ref.into();
        if art_ref.trim().is_empty() {
            return;
        }

        // only the newest art request survives a single turn
        self.blocks
            .retain(|b| !matches!(b, OutputBlock::Art(_) | OutputBlock::ArtClear));
        self.blocks.push(OutputBlock::Art(art_ref));
    }

    pub fn art_clear(&mut self) {
        self.blocks
            .retain(|b| !matches!(b, OutputBlock::Art(_) | OutputBlock::ArtClear));
        self.blocks.push(OutputBlock::ArtClear);
    }

    pub fn refresh(&mut self, panel: Panel) {
        // ensure at most one refresh per panel, always last
        self.blocks
            .retain(|b| !matches!(b, OutputBlock::Refresh(p) if *p == panel));
        self.blocks.push(OutputBlock::Refresh(panel));
    }

    /// Log lines only, for asserting on turn output.
    pub fn text_lines(&self) -> Vec<&str> {
        self.blocks
            .iter()
            .filter_map(|b| match b {
                OutputBlock::Text(s) => Some(s.as_str()),
                _ => None,
            })
            .collect()
    }
}
