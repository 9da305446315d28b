/// Page scroll lock, tied to the number of open dialogs rather than to any
/// single open or close
#[derive(Debug, Default)]
pub struct ScrollLock {
    engaged: bool,
}

impl ScrollLock {
    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    /// Reconcile with the current open-dialog count. Returns the new state
    /// when it changed, `None` otherwise.
    pub fn sync(&mut self, open_dialogs: usize) -> Option<bool> {
        let want = open_dialogs > 0;
        if want == self.engaged {
            return None;
        }
        self.engaged = want;
        Some(want)
    }
}
