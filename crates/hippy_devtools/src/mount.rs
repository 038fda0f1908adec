//! Ownership of the single inspector root rendered into the content node.
//!
//! The controller never renders by itself; [`Frontend`](crate::frontend)
//! asks it to start a reload, schedules the remount, and hands the rendered
//! root back with the generation it was scheduled for. A remount whose
//! generation is no longer current is discarded.

use crate::platform::{ContentNode, MountedUi, PendingTask, TransportError};

const ANOTHER_INSTANCE_HTML: &str = r#"
      <div class="box">
        <div class="box-header">
          Another instance of DevTools is running.
        </div>
        <div class="box-content">
          Only one copy of DevTools can be used at a time.
        </div>
      </div>
    "#;

fn unknown_error_html(message: &str) -> String {
    format!(
        r#"
      <div class="box">
        <div class="box-header">
          Unknown error
        </div>
        <div class="box-content">
          {}
        </div>
      </div>
    "#,
        html_escape::encode_text(message)
    )
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MountState {
    Empty,
    /// A remount is scheduled but has not fired yet.
    Pending,
    Mounted,
}

pub(crate) struct MountController<N: ContentNode + Clone> {
    node: Option<N>,
    /// Markup the node held when it was registered
    placeholder: String,
    root: Option<Box<dyn MountedUi>>,
    generation: u64,
    pending: Option<Box<dyn PendingTask>>,
}

impl<N: ContentNode + Clone> MountController<N> {
    pub(crate) fn new() -> Self {
        Self {
            node: None,
            placeholder: String::new(),
            root: None,
            generation: 0,
            pending: None,
        }
    }

    pub(crate) fn set_node(&mut self, node: N) {
        self.placeholder = node.inner_html();
        self.node = Some(node);
    }

    pub(crate) fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    pub(crate) fn state(&self) -> MountState {
        if self.root.is_some() {
            MountState::Mounted
        } else if self.pending.is_some() {
            MountState::Pending
        } else {
            MountState::Empty
        }
    }

    /// Synchronously tears down the current root, if any.
    pub(crate) fn unmount(&mut self) {
        if let Some(root) = self.root.take() {
            root.unmount();
        }
    }

    fn cancel_pending(&mut self) {
        if let Some(task) = self.pending.take() {
            task.cancel();
        }
    }

    /// Unmounts, clears the node and invalidates any scheduled remount.
    ///
    /// Returns the generation the next remount must carry, or `None` when
    /// there is no node to render into.
    pub(crate) fn begin_reload(&mut self) -> Option<u64> {
        self.unmount();
        self.cancel_pending();
        self.generation += 1;

        let node = self.node.as_ref()?;
        node.set_inner_html("");
        Some(self.generation)
    }

    pub(crate) fn set_pending(&mut self, generation: u64, task: Box<dyn PendingTask>) {
        if generation == self.generation && self.root.is_none() {
            self.cancel_pending();
            self.pending = Some(task);
        } else {
            task.cancel();
        }
    }

    pub(crate) fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Stores the root rendered for `generation`.
    ///
    /// A root for a superseded generation is unmounted straight away.
    pub(crate) fn finish_mount(&mut self, generation: u64, root: Box<dyn MountedUi>) {
        if !self.is_current(generation) {
            root.unmount();
            return;
        }
        // The pending task is the one that just fired
        self.pending = None;
        self.unmount();
        self.root = Some(root);
    }

    /// Unmounts and puts the registered placeholder back.
    pub(crate) fn restore_placeholder(&mut self) {
        self.unmount();
        self.cancel_pending();
        self.generation += 1;

        if let Some(node) = &self.node {
            node.set_inner_html(&self.placeholder);
        }
    }

    /// Unmounts and shows the message matching `error`.
    pub(crate) fn show_error(&mut self, error: &TransportError) {
        self.unmount();
        self.cancel_pending();
        self.generation += 1;

        if let Some(node) = &self.node {
            if error.is_address_in_use() {
                node.set_inner_html(ANOTHER_INSTANCE_HTML);
            } else {
                node.set_inner_html(&unknown_error_html(&error.message));
            }
        }
    }
}
