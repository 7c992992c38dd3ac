use std::cell::{Cell, RefCell};

use egui::ViewportCommand;
use screen_pen::overlay::ViewportCtx;

/// Records every window command the overlay sends.
#[derive(Default)]
pub struct MockCtx {
    pub commands: RefCell<Vec<ViewportCommand>>,
    pub repaints: Cell<usize>,
}

impl MockCtx {
    /// The most recent mouse-passthrough state pushed to the window.
    pub fn last_passthrough(&self) -> Option<bool> {
        self.commands.borrow().iter().rev().find_map(|cmd| match cmd {
            ViewportCommand::MousePassthrough(enabled) => Some(*enabled),
            _ => None,
        })
    }

    pub fn passthrough_count(&self) -> usize {
        self.commands
            .borrow()
            .iter()
            .filter(|cmd| matches!(cmd, ViewportCommand::MousePassthrough(_)))
            .count()
    }

    pub fn reset(&self) {
        self.commands.borrow_mut().clear();
        self.repaints.set(0);
    }
}

impl ViewportCtx for MockCtx {
    fn send_viewport_cmd(&self, cmd: ViewportCommand) {
        self.commands.borrow_mut().push(cmd);
    }

    fn request_repaint(&self) {
        self.repaints.set(self.repaints.get() + 1);
    }
}
