//! Block workers
//!
//! Blocks are partitioned over a fixed set of workers by height. Each worker
//! owns its queue and processes its blocks one at a time, so blocks of the
//! same partition are handled in submission order.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::domain::Block;
use crate::modules::Modules;

const QUEUE_CAPACITY: usize = 64;

#[derive(Debug, thiserror::Error)]
pub enum WorkerError {
    #[error("Worker {0} has stopped")]
    Closed(usize),
}

/// Worker receiving the block at `height`
pub fn partition(height: i64, workers: usize) -> usize {
    height.rem_euclid(workers.max(1) as i64) as usize
}

pub struct WorkerPool {
    senders: Vec<mpsc::Sender<Block>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawn `workers` workers sharing `modules`
    pub fn start(modules: Modules, workers: usize) -> Self {
        let workers = workers.max(1);
        let mut senders = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);

        for id in 0..workers {
            let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
            senders.push(tx);
            handles.push(tokio::spawn(run_worker(id, modules.clone(), rx)));
        }

        tracing::info!(workers, "Block workers started");
        Self { senders, handles }
    }

    pub fn workers(&self) -> usize {
        self.senders.len()
    }

    /// Queue `block` on its partition's worker; waits while that queue is full
    pub async fn submit(&self, block: Block) -> Result<(), WorkerError> {
        let id = partition(block.height, self.senders.len());
        self.senders[id]
            .send(block)
            .await
            .map_err(|_| WorkerError::Closed(id))
    }

    /// Close every queue and wait until the queued blocks are processed
    pub async fn shutdown(self) {
        drop(self.senders);

        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Worker task panicked");
            }
        }

        tracing::info!("Block workers stopped");
    }
}

async fn run_worker(id: usize, modules: Modules, mut rx: mpsc::Receiver<Block>) {
    while let Some(block) = rx.recv().await {
        match modules.handle_block(&block).await {
            Ok(()) => {
                tracing::debug!(worker = id, height = block.height, txs = block.txs.len(), "Block processed");
            }
            Err(e) => {
                tracing::error!(worker = id, height = block.height, error = %e, "Block processed with failures");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Msg, MsgBuyRequest, Tx};
    use crate::modules::{Capabilities, Capability, Module, ModuleError};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    struct Heights(Arc<Mutex<Vec<i64>>>);

    #[async_trait]
    impl Module for Heights {
        fn name(&self) -> &'static str {
            "heights"
        }

        fn capabilities(&self) -> Capabilities {
            Capability::Messages.into()
        }

        async fn handle_msg(&self, _index: usize, _msg: &Msg, tx: &Tx) -> Result<(), ModuleError> {
            self.0.lock().unwrap().push(tx.height);
            Ok(())
        }
    }

    fn block(height: i64) -> Block {
        Block {
            height,
            txs: vec![Tx {
                hash: format!("TX{height}"),
                height,
                success: true,
                messages: vec![Msg::StakeBuy(MsgBuyRequest {
                    creator: "ovg1a".to_string(),
                    amount: "1".to_string(),
                })],
            }],
        }
    }

    #[test]
    fn test_partition() {
        assert_eq!(partition(0, 5), 0);
        assert_eq!(partition(7, 5), 2);
        assert_eq!(partition(10, 5), 0);
        assert_eq!(partition(3, 1), 0);
        assert_eq!(partition(3, 0), 0);
    }

    #[tokio::test]
    async fn test_every_block_is_processed_before_shutdown_returns() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let module: Arc<dyn Module> = Arc::new(Heights(seen.clone()));
        let modules = Modules::new(vec![module]);
        let pool = WorkerPool::start(modules, 3);

        for height in 1..=9 {
            pool.submit(block(height)).await.unwrap();
        }
        pool.shutdown().await;

        let mut heights = seen.lock().unwrap().clone();
        heights.sort_unstable();
        assert_eq!(heights, (1..=9).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_zero_workers_starts_one() {
        let modules = Modules::new(Vec::new());
        let pool = WorkerPool::start(modules, 0);

        assert_eq!(pool.workers(), 1);
        pool.submit(block(5)).await.unwrap();
        pool.shutdown().await;
    }

    #[tokio::test]
    async fn test_same_partition_keeps_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let module: Arc<dyn Module> = Arc::new(Heights(seen.clone()));
        let modules = Modules::new(vec![module]);
        let pool = WorkerPool::start(modules, 2);

        for height in [2, 4, 6, 8] {
            pool.submit(block(height)).await.unwrap();
        }
        pool.shutdown().await;

        assert_eq!(*seen.lock().unwrap(), vec![2, 4, 6, 8]);
    }
}
