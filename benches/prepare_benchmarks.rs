use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use biomech_windows::config::DatasetConfig;
use biomech_windows::dataset::{scan_windows, WindowedDataset};
use biomech_windows::source::{JsonRecordingSource, SyntheticSubject};
use std::path::Path;

const WINDOW_SIZES: &[usize] = &[5, 25, 100];
const TRIAL_LENGTHS: &[usize] = &[500, 5_000, 50_000];
const SUBJECT_COUNTS: &[usize] = &[1, 4];

fn missing_mask(len: usize) -> Vec<bool> {
    // Short force-plate gaps every 97 frames
    (0..len).map(|i| i % 97 < 3).collect()
}

fn benchmark_window_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_scan");

    for &len in TRIAL_LENGTHS {
        let mask = missing_mask(len);
        group.throughput(Throughput::Elements(len as u64));

        for &window_size in WINDOW_SIZES {
            group.bench_with_input(
                BenchmarkId::new(format!("ws{}", window_size), len),
                &mask,
                |b, mask| b.iter(|| scan_windows(black_box(mask), window_size)),
            );
        }
    }

    group.finish();
}

fn write_subjects(dir: &Path, subjects: usize) {
    let missing: Vec<usize> = (0..400).filter(|f| f % 97 < 3).collect();
    for i in 0..subjects {
        let subject = SyntheticSubject::new(60.0 + i as f64, &["calcn_r", "calcn_l"])
            .with_dofs(23)
            .with_joints(12)
            .with_trial(400, &missing)
            .with_trial(250, &[])
            .build();
        let path = dir.join(format!("s{:02}.json", i));
        if let Err(e) = JsonRecordingSource::write_subject(&path, &subject) {
            panic!("failed to write {}: {}", path.display(), e);
        }
    }
}

fn benchmark_prepare(c: &mut Criterion) {
    let mut group = c.benchmark_group("prepare");
    group.sample_size(20);

    for &subjects in SUBJECT_COUNTS {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(e) => panic!("failed to create temp dir: {}", e),
        };
        write_subjects(dir.path(), subjects);

        for &window_size in &[5usize, 25] {
            let mut config = DatasetConfig::for_path(dir.path(), window_size);
            config.dataset.skip_loading_skeletons = true;

            group.bench_with_input(
                BenchmarkId::new(format!("{}subj", subjects), window_size),
                &config,
                |b, config| {
                    b.iter(|| {
                        let mut dataset = match WindowedDataset::new(JsonRecordingSource::new(), config.clone()) {
                            Ok(dataset) => dataset,
                            Err(e) => panic!("dataset setup failed: {}", e),
                        };
                        let windows = dataset.prepare_all().map(|s| s.windows).unwrap_or(0);
                        black_box(windows)
                    });
                },
            );
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_window_scan, benchmark_prepare);
criterion_main!(benches);
