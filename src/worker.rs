//! Serializes cube access from many threads through one owning thread.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use tracing::{debug, warn};

use crate::{
    cube::{BlinkMode, Cube},
    firmata::Firmata,
    time::Delay,
    Error, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Off,
    Red,
    Green,
    Blink(BlinkMode),
}

enum Msg {
    Run(Request, Sender<Result<()>>),
    Close(Sender<Result<()>>),
}

pub struct CubeWorker;

impl CubeWorker {
    /// Moves `cube` onto its own thread. Requests run one at a time in
    /// arrival order.
    pub fn spawn<F, D>(cube: Cube<F, D>) -> Result<(CubeHandle, JoinHandle<()>)>
    where
        F: Firmata + Send + 'static,
        D: Delay + Send + 'static,
    {
        let (msg_tx, msg_rx) = unbounded();
        let join = thread::Builder::new()
            .name("cube-worker".into())
            .spawn(move || run(cube, msg_rx))?;

        Ok((CubeHandle { msg_tx }, join))
    }
}

fn run<F: Firmata, D: Delay>(mut cube: Cube<F, D>, msg_rx: Receiver<Msg>) {
    while let Ok(msg) = msg_rx.recv() {
        match msg {
            Msg::Run(req, resp_tx) => {
                debug!("worker running {:?}", req);
                let res = match req {
                    Request::Off => cube.off(),
                    Request::Red => cube.red(),
                    Request::Green => cube.green(),
                    Request::Blink(mode) => cube.blink(mode),
                };

                if resp_tx.send(res).is_err() {
                    warn!("requester of {:?} went away", req);
                }
            }

            Msg::Close(resp_tx) => {
                let _ = resp_tx.send(cube.close());
                return;
            }
        }
    }

    // every handle dropped without close
    if let Err(e) = cube.close() {
        warn!("closing cube after handles dropped: {}", e);
    }
}

/// Cloneable access to a cube owned by a [`CubeWorker`].
#[derive(Clone)]
pub struct CubeHandle {
    msg_tx: Sender<Msg>,
}

impl CubeHandle {
    pub fn request(&self, req: Request) -> Result<()> {
        let (resp_tx, resp_rx) = bounded(1);
        self.msg_tx
            .send(Msg::Run(req, resp_tx))
            .map_err(|_| Error::Other("cube worker gone".into()))?;

        resp_rx
            .recv()
            .map_err(|_| Error::Other("response chan broken".into()))?
    }

    pub fn off(&self) -> Result<()> {
        self.request(Request::Off)
    }

    pub fn red(&self) -> Result<()> {
        self.request(Request::Red)
    }

    pub fn green(&self) -> Result<()> {
        self.request(Request::Green)
    }

    pub fn blink(&self, mode: BlinkMode) -> Result<()> {
        self.request(Request::Blink(mode))
    }

    /// Stops the worker and closes the cube. Other handles fail afterwards.
    pub fn close(self) -> Result<()> {
        let (resp_tx, resp_rx) = bounded(1);
        self.msg_tx
            .send(Msg::Close(resp_tx))
            .map_err(|_| Error::Other("cube worker gone".into()))?;

        resp_rx
            .recv()
            .map_err(|_| Error::Other("response chan broken".into()))?
    }
}
