use rand::{rngs::OsRng, rngs::StdRng, RngCore, SeedableRng};
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Process identity within a distributed run. Initialized once, as the
/// first thing `main` does; an uninitialized process behaves as a
/// single-rank run.
#[derive(Debug)]
pub struct Context {
    rank: usize,
    world_size: usize,
}

static CONTEXT: OnceLock<Context> = OnceLock::new();

impl Context {
    pub fn init(rank: usize, world_size: usize) -> &'static Context {
        assert!(
            rank < world_size,
            "rank {} out of range for world size {}",
            rank,
            world_size
        );
        let ctx = CONTEXT.get_or_init(|| Context { rank, world_size });
        assert!(
            ctx.rank == rank && ctx.world_size == world_size,
            "process context already initialized as rank {} of {}",
            ctx.rank,
            ctx.world_size
        );
        ctx
    }

    pub fn global() -> &'static Context {
        CONTEXT.get_or_init(|| Context {
            rank: 0,
            world_size: 1,
        })
    }

    pub fn rank(&self) -> usize {
        self.rank
    }

    pub fn world_size(&self) -> usize {
        self.world_size
    }
}

/// Rank of this process.
pub fn current_rank() -> usize {
    Context::global().rank()
}

/// Required environment lookup. A missing variable is a cluster
/// configuration error and aborts the process.
pub fn get_env(name: &str) -> String {
    match std::env::var(name) {
        Ok(value) => value,
        Err(_) => panic!("environment variable {} is not defined", name),
    }
}

/// Seed drawn from the system entropy source, with a deterministic
/// fallback combining process id, thread id, and wall-clock time.
pub fn cluster_seed() -> u64 {
    let mut bytes = [0u8; 8];
    if OsRng.try_fill_bytes(&mut bytes).is_ok() {
        return u64::from_le_bytes(bytes);
    }
    tracing::warn!("system entropy source not available, using fallback seed");
    let pid = std::process::id() as u64;
    let tid = {
        let mut hasher = DefaultHasher::new();
        std::thread::current().id().hash(&mut hasher);
        hasher.finish()
    };
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    secs.wrapping_mul(181)
        .wrapping_mul((pid.wrapping_add(tid).wrapping_sub(83)).wrapping_mul(359))
        % 104729
}

thread_local! {
    static RNG: RefCell<StdRng> = RefCell::new(StdRng::seed_from_u64(cluster_seed()));
}

/// Runs `f` with the thread-local RNG used for parameter initialization
/// and data augmentation.
pub fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut StdRng) -> R,
{
    RNG.with(|rng| f(&mut rng.borrow_mut()))
}
