#![no_main]

use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use libfuzzer_sys::fuzz_target;

mod utils;

const TIMEOUT: Duration = Duration::from_secs(1);

/// Parses on a worker thread so a hang shows up as a timeout panic.
struct Worker {
    input_tx: mpsc::SyncSender<Vec<u8>>,
    done_rx: Mutex<mpsc::Receiver<()>>,
}

fn worker() -> &'static Worker {
    static WORKER: OnceLock<Worker> = OnceLock::new();
    WORKER.get_or_init(|| {
        let (input_tx, input_rx) = mpsc::sync_channel::<Vec<u8>>(0);
        let (done_tx, done_rx) = mpsc::sync_channel::<()>(0);

        std::thread::spawn(move || {
            for input in input_rx {
                if let Ok(class) = widgen_classfile::ClassFile::parse(&input) {
                    let _ = widgen_catalog::ClassStub::from_classfile(
                        class,
                        PathBuf::from("fuzz.jar"),
                    );
                }
                let _ = done_tx.send(());
            }
        });

        Worker {
            input_tx,
            done_rx: Mutex::new(done_rx),
        }
    })
}

fuzz_target!(|data: &[u8]| {
    let cap = data.len().min(utils::MAX_INPUT_SIZE);

    let worker = worker();
    worker
        .input_tx
        .send(data[..cap].to_vec())
        .expect("fuzz_classfile worker exited");

    match worker
        .done_rx
        .lock()
        .expect("fuzz_classfile receiver poisoned")
        .recv_timeout(TIMEOUT)
    {
        Ok(()) => {}
        Err(mpsc::RecvTimeoutError::Timeout) => panic!("fuzz_classfile timed out"),
        Err(mpsc::RecvTimeoutError::Disconnected) => panic!("fuzz_classfile worker panicked"),
    }
});
