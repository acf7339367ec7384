mod rounds;

use criterion::criterion_main;

criterion_main!(rounds::benches);
