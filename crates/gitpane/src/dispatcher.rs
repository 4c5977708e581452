//! Dispatcher for completion messages
//!
//! Background work never touches the view. It sends one [`Msg`] per command
//! through the dispatcher, and the event loop drains them on its own thread.

use crate::msg::Msg;
use std::sync::mpsc::Sender;

#[derive(Clone)]
pub struct Dispatcher {
    msg_tx: Sender<Msg>,
}

impl Dispatcher {
    pub fn new(msg_tx: Sender<Msg>) -> Self {
        Self { msg_tx }
    }

    /// Queue a message for the event loop
    pub fn dispatch(&self, msg: Msg) {
        if let Err(e) = self.msg_tx.send(msg) {
            log::error!("Dispatcher: failed to send message: {}", e);
        }
    }
}
