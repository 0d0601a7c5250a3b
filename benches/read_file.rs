use std::io::Cursor;

use ape2::{ApeTag, Item, ItemAccess, ItemValue, TagOptions};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn build_tagged_buffer(item_count: u32) -> Vec<u8> {
	let mut tag = ApeTag::new(Cursor::new(b"AUDIODATAAUDIODATA".to_vec()), TagOptions::new());
	for i in 0..item_count {
		let key = format!("Key{i}");
		let value = format!("value-{i}");
		tag.insert(Item::new(key, ItemValue::Utf8(value.into_bytes()), ItemAccess::ReadWrite).unwrap())
			.unwrap();
	}
	tag.update().unwrap();
	tag.into_inner().into_inner()
}

fn bench_parse(c: &mut Criterion) {
	let buffer = build_tagged_buffer(32);
	c.bench_function("parse 32-item tag", |b| {
		b.iter(|| {
			let mut tag = ApeTag::new(Cursor::new(black_box(buffer.clone())), TagOptions::new());
			tag.parse().unwrap();
			black_box(tag.item_count());
		})
	});
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
