#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertState {
    Normal,
    BreakDue,
}

/// Display color paired with each alert state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertColor {
    LightGreen,
    Yellow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub state: AlertState,
    pub message: String,
    pub color: AlertColor,
}

impl Alert {
    pub fn is_break_due(&self) -> bool {
        self.state == AlertState::BreakDue
    }
}
