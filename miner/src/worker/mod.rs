mod ethash_simple;

pub use ethash_simple::EthashSimple;

use crossbeam_channel::{unbounded, Sender};
use ethash::{PowEngine, RawHeader, Seal};
use log::error;
use numext_fixed_hash::H256;
use rand::{thread_rng, Rng};
use std::sync::Arc;
use std::thread;

#[derive(Clone)]
pub enum WorkerMessage {
    Stop,
    Start,
    NewWork(RawHeader),
}

pub struct WorkerController {
    inner: Vec<Sender<WorkerMessage>>,
}

impl WorkerController {
    pub fn new(inner: Vec<Sender<WorkerMessage>>) -> Self {
        Self { inner }
    }

    pub fn send_message(&self, message: WorkerMessage) {
        for worker_tx in self.inner.iter() {
            if let Err(err) = worker_tx.send(message.clone()) {
                error!("worker_tx send error {:?}", err);
            };
        }
    }
}

/// Spawn `threads` worker threads over the engine. Each starts from its own
/// random nonce and increments wrapping from there.
pub fn start_worker(
    pow: Arc<dyn PowEngine>,
    threads: usize,
    seal_tx: Sender<(H256, Seal)>,
) -> WorkerController {
    let worker_txs = (0..threads)
        .map(|i| {
            let (worker_tx, worker_rx) = unbounded();
            let (pow, seal_tx) = (Arc::clone(&pow), seal_tx.clone());
            thread::Builder::new()
                .name(format!("EthashWorker-{}", i))
                .spawn(move || {
                    let mut nonce: u64 = thread_rng().gen();
                    let mut worker = EthashSimple::new(pow, seal_tx, worker_rx);
                    worker.run(|| {
                        let current = nonce;
                        nonce = nonce.wrapping_add(1);
                        current
                    });
                })
                .expect("Start `EthashSimple` worker thread failed");
            worker_tx
        })
        .collect();
    WorkerController::new(worker_txs)
}

pub trait Worker {
    fn run<G: FnMut() -> u64>(&mut self, rng: G);
}
