//! Benchmarks for in-process conversions.
//!
//! Run with: cargo bench
//!
//! Each group scales the input size so layout and parsing costs show up
//! separately from fixed package overhead.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use fileshift::docx::{read_paragraphs_from_xml, DocxWriter};
use fileshift::pdf::PdfWriter;
use fileshift::{ConversionRequest, ConverterConfig, Dispatcher, PageLayout, Registry, TextImageOptions};
use tempfile::TempDir;

fn sample_lines(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "Paragraph {} with enough words to wrap across the column at least once when laid out on an A4 page.",
                i
            )
        })
        .collect()
}

fn document_xml(paragraph_count: usize) -> String {
    let mut xml = String::from(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>"#,
    );
    for line in sample_lines(paragraph_count) {
        xml.push_str(&format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, line));
    }
    xml.push_str("</w:body></w:document>");
    xml
}

fn bench_docx_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("docx_read");
    for size in [10, 100, 1000] {
        let xml = document_xml(size);
        group.throughput(Throughput::Bytes(xml.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &xml, |b, xml| {
            b.iter(|| read_paragraphs_from_xml(black_box(xml)).unwrap())
        });
    }
    group.finish();
}

fn bench_pdf_layout(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let mut group = c.benchmark_group("pdf_write");
    for size in [10, 100, 1000] {
        let lines = sample_lines(size);
        let path = dir.path().join(format!("bench_{size}.pdf"));
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| {
                let mut writer = PdfWriter::new(PageLayout::default());
                writer.write_paragraphs(black_box(lines));
                writer.save(&path).unwrap();
            })
        });
    }
    group.finish();
}

fn bench_text_image(c: &mut Criterion) {
    let options = TextImageOptions::default();
    let mut group = c.benchmark_group("text_image");
    for size in [10, 100] {
        let lines = sample_lines(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &lines, |b, lines| {
            b.iter(|| fileshift::raster::render_text(black_box(lines), &options))
        });
    }
    group.finish();
}

fn bench_dispatch(c: &mut Criterion) {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("input.docx");
    let mut writer = DocxWriter::new();
    for line in sample_lines(200) {
        writer.add_paragraph(&line);
    }
    writer.save(&src).unwrap();

    let config = ConverterConfig::new().with_scratch_dir(dir.path());
    let dispatcher = Dispatcher::new(Registry::with_defaults(&config));

    let mut group = c.benchmark_group("dispatch");
    for target in ["txt", "pdf", "xlsx"] {
        let request = ConversionRequest::new(&src, dir.path().join(format!("output.{target}")));
        group.bench_function(target, |b| {
            b.iter(|| dispatcher.convert(black_box(&request)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_docx_read,
    bench_pdf_layout,
    bench_text_image,
    bench_dispatch
);
criterion_main!(benches);
