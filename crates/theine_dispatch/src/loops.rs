use crossbeam::channel::{self, Sender};
use std::sync::{Condvar, Mutex};
use std::thread::JoinHandle;
use theine_core::device::Device;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// An execution context node computations are posted onto. The host
/// loop is a shared thread pool; each GPU (device, thread) pair gets a
/// dedicated single-thread loop so same-device work serializes.
pub trait TaskLoop: Send + Sync {
    fn post(&self, task: Task);
}

/// Host-side pool shared by every CPU-placed operation.
pub struct ThreadPool {
    pool: rayon::ThreadPool,
}

impl ThreadPool {
    pub fn new() -> Self {
        let pool = rayon::ThreadPoolBuilder::new()
            .build()
            .unwrap_or_else(|err| panic!("failed to build host thread pool: {}", err));
        Self { pool }
    }
}

impl Default for ThreadPool {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskLoop for ThreadPool {
    fn post(&self, task: Task) {
        self.pool.spawn(task);
    }
}

/// Single worker thread bound to one device. Tasks run in post order,
/// one at a time; distinct devices run concurrently.
pub struct DeviceLoop {
    device: Device,
    sender: Option<Sender<Task>>,
    worker: Option<JoinHandle<()>>,
}

impl DeviceLoop {
    pub fn new(device: Device) -> Self {
        let (sender, receiver) = channel::unbounded::<Task>();
        let worker = std::thread::Builder::new()
            .name(format!("theine-{}", device.name()))
            .spawn(move || {
                for task in receiver.iter() {
                    task();
                }
            })
            .unwrap_or_else(|err| panic!("failed to spawn loop for {}: {}", device.name(), err));
        Self {
            device,
            sender: Some(sender),
            worker: Some(worker),
        }
    }

    pub fn device(&self) -> Device {
        self.device
    }
}

impl TaskLoop for DeviceLoop {
    fn post(&self, task: Task) {
        let sender = self.sender.as_ref().unwrap();
        if sender.send(task).is_err() {
            panic!("loop for {} has shut down", self.device.name());
        }
    }
}

impl Drop for DeviceLoop {
    fn drop(&mut self) {
        self.sender.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

/// Counting semaphore gating `sync()`: sink firings increment it, and
/// the waiter blocks until the round's sink count is reached, then
/// resets the counter for the next round.
pub struct SinkCounter {
    count: Mutex<usize>,
    reached: Condvar,
}

impl SinkCounter {
    pub fn new() -> Self {
        Self {
            count: Mutex::new(0),
            reached: Condvar::new(),
        }
    }

    pub fn increment(&self) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        *count += 1;
        self.reached.notify_all();
    }

    pub fn wait(&self, target: usize) {
        let mut count = self.count.lock().unwrap_or_else(|e| e.into_inner());
        while *count < target {
            count = self
                .reached
                .wait(count)
                .unwrap_or_else(|e| e.into_inner());
        }
        debug_assert_eq!(
            *count, target,
            "sink counter overshot the round's sink count"
        );
        *count = 0;
    }

    pub fn value(&self) -> usize {
        *self.count.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for SinkCounter {
    fn default() -> Self {
        Self::new()
    }
}
