use criterion::{Criterion, black_box, criterion_group, criterion_main};
use resume_export::{
    capture::{Snapshot, encode_jpeg},
    pdf::{PageGeometry, package},
    resume::{ResumeData, render},
};

fn benchmark_packaging(c: &mut Criterion) {
    let preview = render(&ResumeData::default()).to_image();
    let jpeg = encode_jpeg(&preview, 100).unwrap();
    let snapshot = Snapshot::new(preview.width(), preview.height(), jpeg, "resume-preview");
    let geometry = PageGeometry::a4_portrait();

    c.bench_function("pdf_package", |b| {
        b.iter(|| {
            let result = package(black_box(&snapshot), black_box(&geometry));
            assert!(result.is_ok());
        })
    });

    c.bench_function("jpeg_encode", |b| {
        b.iter(|| {
            let result = encode_jpeg(black_box(&preview), 100);
            assert!(result.is_ok());
        })
    });
}

criterion_group!(benches, benchmark_packaging);
criterion_main!(benches);
