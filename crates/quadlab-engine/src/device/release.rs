/// A GPU object that can be given up explicitly.
///
/// Buffers and textures free their memory right away through `destroy`;
/// pipelines and bind groups go away when their last handle drops.
pub trait Release {
    fn release(self);
}

impl Release for wgpu::Buffer {
    fn release(self) {
        self.destroy();
    }
}

impl Release for wgpu::Texture {
    fn release(self) {
        self.destroy();
    }
}

impl Release for wgpu::BindGroup {
    fn release(self) {
        drop(self);
    }
}

impl Release for wgpu::RenderPipeline {
    fn release(self) {
        drop(self);
    }
}

/// Labelled release actions run in reverse registration order.
///
/// Owners register their objects in creation order; the queue then releases
/// them last-created-first, either when [`release_all`](Self::release_all) is
/// called or when the queue is dropped. Each action runs at most once.
#[derive(Default)]
pub struct ReleaseQueue {
    entries: Vec<(&'static str, Box<dyn FnOnce()>)>,
}

impl ReleaseQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `release` to run when this queue is drained.
    pub fn push(&mut self, label: &'static str, release: impl FnOnce() + 'static) {
        self.entries.push((label, Box::new(release)));
    }

    /// Hands `object` to the queue; it is released when its turn comes.
    pub fn push_owned<T: Release + 'static>(&mut self, label: &'static str, object: T) {
        self.push(label, move || object.release());
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs every pending action, newest first, and returns their labels in
    /// the order they ran.
    pub fn release_all(&mut self) -> Vec<&'static str> {
        let mut order = Vec::with_capacity(self.entries.len());
        while let Some((label, release)) = self.entries.pop() {
            log::debug!("releasing {label}");
            release();
            order.push(label);
        }
        order
    }
}

impl Drop for ReleaseQueue {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    type Log = Rc<RefCell<Vec<&'static str>>>;

    /// Records its name when released or dropped, whichever comes first.
    struct Tracked {
        name: &'static str,
        log: Log,
        done: bool,
    }

    impl Tracked {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                done: false,
            }
        }
    }

    impl Release for Tracked {
        fn release(mut self) {
            self.done = true;
            self.log.borrow_mut().push(self.name);
        }
    }

    impl Drop for Tracked {
        fn drop(&mut self) {
            if !self.done {
                self.log.borrow_mut().push(self.name);
            }
        }
    }

    #[test]
    fn releases_in_reverse_creation_order() {
        let mut queue = ReleaseQueue::new();
        queue.push("program", || {});
        queue.push("buffers", || {});
        queue.push("bindings", || {});

        assert_eq!(queue.release_all(), vec!["bindings", "buffers", "program"]);
        assert!(queue.is_empty());
    }

    #[test]
    fn owned_objects_are_gone_once_released() {
        let log = Log::default();
        let mut queue = ReleaseQueue::new();
        let program = Rc::new(Tracked::new("program", &log));
        let weak = Rc::downgrade(&program);
        queue.push("program", move || drop(program));

        assert!(weak.upgrade().is_some());
        queue.release_all();
        assert!(weak.upgrade().is_none());
        assert_eq!(*log.borrow(), vec!["program"]);
    }

    #[test]
    fn drop_releases_pending_objects() {
        let log = Log::default();
        {
            let mut queue = ReleaseQueue::new();
            queue.push_owned("program", Tracked::new("program", &log));
            queue.push_owned("vertex buffer", Tracked::new("vertex buffer", &log));
            queue.push_owned("bind group", Tracked::new("bind group", &log));
            assert_eq!(queue.len(), 3);
            assert!(log.borrow().is_empty());
        }
        assert_eq!(*log.borrow(), vec!["bind group", "vertex buffer", "program"]);
    }

    #[test]
    fn actions_run_once() {
        let count = Rc::new(RefCell::new(0));
        let mut queue = ReleaseQueue::new();
        let c = Rc::clone(&count);
        queue.push("counter", move || *c.borrow_mut() += 1);

        queue.release_all();
        assert!(queue.release_all().is_empty());
        drop(queue);
        assert_eq!(*count.borrow(), 1);
    }

    #[test]
    fn release_happens_before_owner_drops_context() {
        // Field order models a window entry: the renderer's queue is drained
        // explicitly, then the context goes last.
        let log = Log::default();
        let context = Tracked::new("context", &log);
        let mut queue = ReleaseQueue::new();
        queue.push_owned("program", Tracked::new("program", &log));
        queue.push_owned("buffers", Tracked::new("buffers", &log));

        queue.release_all();
        drop(context);

        assert_eq!(*log.borrow(), vec!["buffers", "program", "context"]);
    }
}
