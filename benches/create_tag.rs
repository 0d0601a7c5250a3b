use std::io::Cursor;

use ape2::{ApeTag, Item, ItemAccess, ItemValue, TagOptions};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_create(c: &mut Criterion) {
	c.bench_function("write 32-item tag", |b| {
		b.iter(|| {
			let mut tag = ApeTag::new(Cursor::new(b"AUDIODATA".to_vec()), TagOptions::new());
			for i in 0..32 {
				let key = format!("Key{i}");
				let value = format!("value-{i}");
				tag.insert(
					Item::new(key, ItemValue::Utf8(value.into_bytes()), ItemAccess::ReadWrite).unwrap(),
				)
				.unwrap();
			}
			tag.update().unwrap();
			black_box(tag.into_inner());
		})
	});
}

criterion_group!(benches, bench_create);
criterion_main!(benches);
