// Intentionally empty; benchmarks live under benches/.
