#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use thingsctl::bridge::{Bridge, Transport, TransportError};
use thingsctl::client::Client;

/// Transport that replays canned replies in order and records every script.
///
/// Probe scripts (addressed to System Events) are answered from `running`
/// without consuming a reply.
pub struct ScriptedTransport {
    replies: RefCell<VecDeque<Result<String, TransportError>>>,
    scripts: RefCell<Vec<String>>,
    running: bool,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            replies: RefCell::new(VecDeque::new()),
            scripts: RefCell::new(Vec::new()),
            running: true,
        }
    }

    pub fn not_running() -> Self {
        Self {
            running: false,
            ..Self::new()
        }
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.borrow_mut().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, message: &str) -> Self {
        self.replies
            .borrow_mut()
            .push_back(Err(TransportError::Script(message.to_string())));
        self
    }

    /// Non-probe scripts sent so far.
    pub fn scripts(&self) -> Vec<String> {
        self.scripts.borrow().clone()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, script: &str) -> Result<String, TransportError> {
        if script.contains("System Events") {
            return Ok(self.running.to_string());
        }
        self.scripts.borrow_mut().push(script.to_string());
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Script("no scripted reply left".to_string())))
    }
}

pub fn client(transport: &ScriptedTransport) -> Client<&ScriptedTransport> {
    Client::new(Bridge::new(transport, "Things3"))
}
