/// What to do with a hardware back press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackAction {
    /// Go back in the page history and consume the press.
    NavigateBack,
    /// Let the platform handle it (usually closing the app).
    Exit,
}

pub fn on_hardware_back(can_go_back: bool) -> BackAction {
    if can_go_back {
        BackAction::NavigateBack
    } else {
        BackAction::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_back_press() {
        assert_eq!(on_hardware_back(true), BackAction::NavigateBack);
        assert_eq!(on_hardware_back(false), BackAction::Exit);
    }
}
