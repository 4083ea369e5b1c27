// src/reader/batch.rs
use super::dive::DiveDecode;
use super::source::ByteSource;
use crate::calibration::CalibrationConfig;
use crate::error::{Result, ZonarError};
use crossbeam_channel::unbounded;
use log::{debug, warn};
use std::io;
use std::path::Path;
use std::thread;

/// Decodes many dive files on a pool of worker threads
///
/// Each file is an independent job: workers pull paths from a shared queue,
/// load and decode them, and send the result back. Results come back in the
/// order the paths were given, whatever order the workers finish in.
///
/// # Example
///
/// ```no_run
/// use zonar_rs::{BatchDecoder, CalibrationConfig};
///
/// let decoder = BatchDecoder::new(CalibrationConfig::default()).with_num_threads(4);
/// for result in decoder.decode_files(&["dive0001.dat", "dive0002.dat"]) {
///     match result {
///         Ok(dive) => println!("dive {:?}: {} samples", dive.dive_number(), dive.samples().len()),
///         Err(e) => eprintln!("{}", e),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct BatchDecoder {
    config: CalibrationConfig,
    num_threads: usize,
}

impl BatchDecoder {
    pub fn new(config: CalibrationConfig) -> Self {
        BatchDecoder {
            config,
            num_threads: 0,
        }
    }

    /// Number of worker threads. 0 picks one per available core.
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub fn config(&self) -> &CalibrationConfig {
        &self.config
    }

    fn worker_count(&self, jobs: usize) -> usize {
        let wanted = if self.num_threads == 0 {
            thread::available_parallelism().map_or(1, |n| n.get())
        } else {
            self.num_threads
        };
        wanted.clamp(1, jobs.max(1))
    }

    /// Load and decode every file, one result per path in input order
    ///
    /// A file that cannot be read yields an `Err`; a file that reads but
    /// decodes only partially yields an `Ok` whose [`DiveDecode::error`] is set.
    /// An invalid calibration fails every path without opening any file.
    pub fn decode_files<P>(&self, paths: &[P]) -> Vec<Result<DiveDecode>>
    where
        P: AsRef<Path> + Sync,
    {
        if let Err(ZonarError::InvalidCalibration(msg)) = self.config.validate() {
            warn!("not decoding {} dive files: {}", paths.len(), msg);
            return paths
                .iter()
                .map(|_| Err(ZonarError::InvalidCalibration(msg.clone())))
                .collect();
        }

        let (job_tx, job_rx) = unbounded::<usize>();
        let (result_tx, result_rx) = unbounded::<(usize, Result<DiveDecode>)>();

        for index in 0..paths.len() {
            if job_tx.send(index).is_err() {
                break;
            }
        }
        drop(job_tx);

        let workers = self.worker_count(paths.len());
        debug!("decoding {} dive files on {} threads", paths.len(), workers);

        let config = &self.config;
        thread::scope(|scope| {
            for _ in 0..workers {
                let job_rx = job_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for index in job_rx.iter() {
                        let result = ByteSource::open(&paths[index]).and_then(|source| source.decode(config));
                        if result_tx.send((index, result)).is_err() {
                            break;
                        }
                    }
                });
            }
        });
        drop(result_tx);

        let mut slots: Vec<Option<Result<DiveDecode>>> = (0..paths.len()).map(|_| None).collect();
        for (index, result) in result_rx.iter() {
            slots[index] = Some(result);
        }

        slots
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| {
                    Err(ZonarError::Io(io::Error::other("dive file was never decoded")))
                })
            })
            .collect()
    }
}
