use super::{Worker, WorkerMessage};
use crossbeam_channel::{Receiver, Sender};
use ethash::{PowEngine, RawHeader, Seal};
use log::{debug, error};
use numext_fixed_hash::H256;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

pub struct EthashSimple {
    pow: Arc<dyn PowEngine>,
    start: bool,
    work: Option<RawHeader>,
    seal_tx: Sender<(H256, Seal)>,
    worker_rx: Receiver<WorkerMessage>,
    seals_found: u64,
}

impl EthashSimple {
    pub fn new(
        pow: Arc<dyn PowEngine>,
        seal_tx: Sender<(H256, Seal)>,
        worker_rx: Receiver<WorkerMessage>,
    ) -> Self {
        Self {
            pow,
            start: true,
            work: None,
            seal_tx,
            worker_rx,
            seals_found: 0,
        }
    }

    fn poll_worker_message(&mut self) {
        if let Ok(msg) = self.worker_rx.try_recv() {
            match msg {
                WorkerMessage::NewWork(header) => {
                    // Warm the epoch cache before the attempt loop hits it.
                    self.pow.init(header.number());
                    self.work = Some(header);
                }
                WorkerMessage::Stop => {
                    self.start = false;
                }
                WorkerMessage::Start => {
                    self.start = true;
                }
            }
        }
    }

    fn solve(&mut self, header: &RawHeader, nonce: u64) {
        debug!("solve, pow_hash {:#x}, nonce {:?}", header.pow_hash(), nonce);
        if let Some(seal) = self.pow.solve(header, nonce) {
            self.seals_found += 1;
            debug!(
                "send new found seal, pow_hash {:#x}, nonce {:?}, total found {}",
                header.pow_hash(),
                nonce,
                self.seals_found
            );
            if let Err(err) = self.seal_tx.send((header.pow_hash().clone(), seal)) {
                error!("seal_tx send error {:?}", err);
            }
        }
    }
}

impl Worker for EthashSimple {
    fn run<G: FnMut() -> u64>(&mut self, mut rng: G) {
        loop {
            self.poll_worker_message();
            if self.start {
                if let Some(work) = self.work.clone() {
                    self.solve(&work, rng());
                }
            } else {
                thread::sleep(Duration::from_millis(100));
            }
        }
    }
}
