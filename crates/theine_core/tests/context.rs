use theine_core::context::{current_rank, get_env, with_rng, Context};

#[test]
fn init_is_idempotent_for_matching_identity() {
    let ctx = Context::init(0, 1);

    assert_eq!(ctx.rank(), 0);
    assert_eq!(ctx.world_size(), 1);

    // Re-initializing with the same identity is allowed.
    Context::init(0, 1);
    assert_eq!(current_rank(), 0);
}

#[test]
fn env_lookup() {
    std::env::set_var("THEINE_TEST_VAR", "42");

    assert_eq!(get_env("THEINE_TEST_VAR"), "42");
}

#[test]
#[should_panic(expected = "is not defined")]
fn missing_env_is_fatal() {
    get_env("THEINE_TEST_VAR_THAT_DOES_NOT_EXIST");
}

#[test]
fn rng_is_usable() {
    use rand::Rng;

    let a: f64 = with_rng(|rng| rng.gen());
    let b: f64 = with_rng(|rng| rng.gen());

    assert!((0.0..1.0).contains(&a));
    assert_ne!(a, b);
}
