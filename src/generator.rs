//! Parallel sample generation.
//!
//! Every worker owns one [`Renderer`] and one independently seeded RNG. Rendered samples are sent
//! over a bounded channel to a single aggregator thread, which names them in arrival order
//! (continuing the count already stored in the dataset) and writes them out. The aggregator stops
//! on an explicit [`Msg::Stop`].

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc;
use std::time::Instant;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::config::{GeneratorConfig, RenderConfig};
use crate::dataset::{self, Dataset, DatasetKind};
use crate::foundation::error::{SynthError, SynthResult};
use crate::render::{RenderOutput, Renderer};

/// How a generation run is executed.
#[derive(Clone, Debug)]
pub struct GenerateOptions {
    /// Worker threads; `None` uses one per core, `Some(0)` renders on the calling thread.
    pub workers: Option<usize>,
    /// Log progress every this many percent of the run.
    pub log_period: f64,
    /// Base seed; worker `i` uses `seed + i`. `None` seeds from the OS.
    pub seed: Option<u64>,
    pub dataset: DatasetKind,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            workers: None,
            log_period: 10.0,
            seed: None,
            dataset: DatasetKind::Img,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GenerateStats {
    /// Samples written by this run.
    pub generated: usize,
    /// Samples in the dataset after this run.
    pub total: usize,
}

/// Messages consumed by the aggregator.
#[derive(Debug)]
pub enum Msg {
    Sample(Box<RenderOutput>),
    Stop,
}

/// Generate `cfg.num_image` samples into a dataset under `cfg.save_dir`.
pub fn generate(cfg: &GeneratorConfig, opts: &GenerateOptions) -> SynthResult<GenerateStats> {
    tracing::info!(
        save_dir = %cfg.save_dir.display(),
        num_image = cfg.num_image,
        "start generating"
    );
    let dataset = dataset::open(opts.dataset, &cfg.save_dir)?;
    generate_into(&cfg.render, cfg.num_image, dataset, opts)
}

/// Generate `num_image` samples into `dataset`.
pub fn generate_into(
    render: &RenderConfig,
    num_image: usize,
    mut dataset: Box<dyn Dataset>,
    opts: &GenerateOptions,
) -> SynthResult<GenerateStats> {
    let workers = match opts.workers {
        Some(0) => 0,
        Some(n) => n.min(num_image.max(1)),
        None => rayon::current_num_threads().min(num_image.max(1)),
    };
    let log_every = ((num_image as f64 * opts.log_period / 100.0) as usize).max(1);

    std::thread::scope(|scope| -> SynthResult<GenerateStats> {
        let (tx, rx) = mpsc::sync_channel::<Msg>(workers.max(1) * 4);

        let aggregator = scope.spawn(move || -> SynthResult<GenerateStats> {
            let start_count = dataset.read_count()?;
            let started = Instant::now();
            let mut count = 0usize;
            for msg in rx.iter() {
                let out = match msg {
                    Msg::Sample(out) => out,
                    Msg::Stop => break,
                };
                let name = format!("{:09}", start_count + count);
                dataset.write(&name, &out.image, &out.label)?;
                count += 1;
                if count % log_every == 0 {
                    let secs = started.elapsed().as_secs_f64().max(f64::EPSILON);
                    tracing::info!(
                        "{count}/{num_image} {:.1}% {:.1} img/s",
                        count as f64 / num_image.max(1) as f64 * 100.0,
                        count as f64 / secs
                    );
                }
            }
            let total = start_count + count;
            dataset.write_count(total)?;
            dataset.close()?;
            tracing::info!("finish generating: {count}, total: {total}");
            Ok(GenerateStats {
                generated: count,
                total,
            })
        });

        let produced = if workers == 0 {
            run_worker(render, 0, opts.seed, &Counter::new(num_image), &tx)
        } else {
            produce_parallel(render, workers, num_image, opts.seed, &tx)
        };

        // The aggregator may already be gone after a write failure; its own error is reported.
        let _ = tx.send(Msg::Stop);
        let stats = aggregator
            .join()
            .map_err(|_| SynthError::dataset("aggregator thread panicked"))??;
        produced?;
        Ok(stats)
    })
}

/// Hands out sample indices until `total` is reached or a worker fails.
struct Counter {
    next: AtomicUsize,
    total: usize,
    failed: AtomicBool,
}

impl Counter {
    fn new(total: usize) -> Self {
        Self {
            next: AtomicUsize::new(0),
            total,
            failed: AtomicBool::new(false),
        }
    }

    fn claim(&self) -> bool {
        !self.failed.load(Ordering::Relaxed) && self.next.fetch_add(1, Ordering::Relaxed) < self.total
    }
}

fn produce_parallel(
    render: &RenderConfig,
    workers: usize,
    num_image: usize,
    seed: Option<u64>,
    tx: &mpsc::SyncSender<Msg>,
) -> SynthResult<()> {
    let pool = build_thread_pool(workers)?;
    let counter = Counter::new(num_image);
    pool.install(|| {
        (0..workers)
            .into_par_iter()
            .try_for_each(|worker| run_worker(render, worker, seed, &counter, tx))
    })
}

fn run_worker(
    render: &RenderConfig,
    worker: usize,
    seed: Option<u64>,
    counter: &Counter,
    tx: &mpsc::SyncSender<Msg>,
) -> SynthResult<()> {
    let result = (|| -> SynthResult<()> {
        let mut renderer = Renderer::new(render)?;
        let mut rng = match seed {
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(worker as u64)),
            None => StdRng::from_os_rng(),
        };
        tracing::debug!(worker, "worker ready");
        while counter.claim() {
            let out = renderer.render(&mut rng)?;
            tx.send(Msg::Sample(Box::new(out)))
                .map_err(|_| SynthError::dataset("aggregator is not accepting samples"))?;
        }
        Ok(())
    })();
    if let Err(e) = &result {
        counter.failed.store(true, Ordering::Relaxed);
        tracing::error!(worker, "worker failed: {e}");
    }
    result
}

fn build_thread_pool(threads: usize) -> SynthResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("synthtext-worker-{i}"))
        .build()
        .map_err(|e| SynthError::config(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/generator.rs"]
mod tests;
