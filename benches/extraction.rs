//! Benchmarks for Java entity extraction
//!
//! Run with: `cargo bench --bench extraction`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use protowiki::extractors::patterns;
use protowiki::{EntityExtractor, JavaExtractor, UnitHints};

const PACKET_SOURCE: &str = r#"
package com.example.protocol.packets.world;

import com.example.protocol.Packet;
import com.example.protocol.math.Vector3f;

public class SpawnEntity implements Packet {
    public static final int PACKET_ID = 42;
    public static final boolean IS_COMPRESSED = true;
    public static final int NULLABLE_BIT_FIELD_SIZE = 1;
    public static final int FIXED_BLOCK_SIZE = 25;
    public static final int VARIABLE_FIELD_COUNT = 2;
    public static final int VARIABLE_BLOCK_START = 26;
    public static final int MAX_SIZE = 1677721600;

    public long entityId;
    @Nullable
    public String displayName;
    public Vector3f position;
    public int[] tags;

    public static ValidationResult validate(ByteBuf buf) {
        if (displayNameLen > 64) {
            throw ProtocolException.stringTooLong("displayName", displayNameLen, 64);
        }
        if (tagsLen > 16) {
            throw ProtocolException.arrayTooLong("tags", tagsLen, 16);
        }
    }
}
"#;

const ENUM_SOURCE: &str = r#"
package com.example.protocol.common;

public enum BlockFace {
    None(0), Up(1), Down(2), North(3), South(4), East(5), West(6);

    public static final BlockFace[] VALUES = values();
    private final int value;
}
"#;

fn bench_extract(c: &mut Criterion) {
    let extractor = JavaExtractor::default();
    let packet_hints = UnitHints::packet("world", "packets/world");
    let support_hints = UnitHints::support("common", "common");

    let mut group = c.benchmark_group("extract");
    group.bench_with_input(BenchmarkId::new("packet", "SpawnEntity"), PACKET_SOURCE, |b, src| {
        b.iter(|| extractor.extract(black_box(src), &packet_hints))
    });
    group.bench_with_input(BenchmarkId::new("enum", "BlockFace"), ENUM_SOURCE, |b, src| {
        b.iter(|| extractor.extract(black_box(src), &support_hints))
    });
    group.finish();
}

fn bench_matchers(c: &mut Criterion) {
    c.bench_function("fields", |b| b.iter(|| patterns::fields(black_box(PACKET_SOURCE))));
    c.bench_function("constants", |b| b.iter(|| patterns::constants(black_box(PACKET_SOURCE))));
    c.bench_function("length_bounds", |b| {
        b.iter(|| patterns::length_bounds(black_box(PACKET_SOURCE)))
    });
}

criterion_group!(benches, bench_extract, bench_matchers);
criterion_main!(benches);
