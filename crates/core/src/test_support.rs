// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Fake actions, checks and triggers for tests.
//!
//! Every fake counts its invocations; clones share the counter so a test can
//! keep one handle while the engine owns another.

use crate::condition::Trigger;
use crate::step::{Check, StepAction};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behavior {
    Succeed,
    Fail(String),
    /// Fail this many times, then succeed
    FailTimes(u32, String),
    Hang,
    Sleep(Duration),
}

/// Scripted [`StepAction`]
#[derive(Debug, Clone)]
pub struct FakeAction {
    behavior: Behavior,
    calls: Arc<AtomicU32>,
}

impl FakeAction {
    fn with(behavior: Behavior) -> Self {
        Self { behavior, calls: Arc::new(AtomicU32::new(0)) }
    }

    pub fn succeed() -> Self {
        Self::with(Behavior::Succeed)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::with(Behavior::Fail(message.into()))
    }

    pub fn fail_times(times: u32, message: impl Into<String>) -> Self {
        Self::with(Behavior::FailTimes(times, message.into()))
    }

    pub fn hang() -> Self {
        Self::with(Behavior::Hang)
    }

    /// Sleep on the tokio clock, then succeed
    pub fn sleep(duration: Duration) -> Self {
        Self::with(Behavior::Sleep(duration))
    }

    /// Number of times the action has been started
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StepAction for FakeAction {
    async fn run(&self) -> anyhow::Result<()> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.behavior {
            Behavior::Succeed => Ok(()),
            Behavior::Fail(msg) => Err(anyhow::anyhow!("{msg}")),
            Behavior::FailTimes(times, msg) if call <= *times => Err(anyhow::anyhow!("{msg}")),
            Behavior::FailTimes(..) => Ok(()),
            Behavior::Hang => std::future::pending().await,
            Behavior::Sleep(d) => {
                tokio::time::sleep(*d).await;
                Ok(())
            }
        }
    }
}

pub fn always_succeeds() -> FakeAction {
    FakeAction::succeed()
}

pub fn always_fails(message: &str) -> FakeAction {
    FakeAction::fail(message)
}

pub fn never_resolves() -> FakeAction {
    FakeAction::hang()
}

/// Scripted [`Check`]: answers from a queue, repeating the last answer
#[derive(Debug, Clone)]
pub struct FakeCheck {
    answers: Arc<Mutex<VecDeque<Result<bool, String>>>>,
    last: Arc<Mutex<Result<bool, String>>>,
    calls: Arc<AtomicU32>,
}

impl FakeCheck {
    pub fn sequence(answers: impl IntoIterator<Item = bool>) -> Self {
        let answers: VecDeque<_> = answers.into_iter().map(Ok).collect();
        let last = answers.back().cloned().unwrap_or(Ok(false));
        Self {
            answers: Arc::new(Mutex::new(answers)),
            last: Arc::new(Mutex::new(last)),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(VecDeque::new())),
            last: Arc::new(Mutex::new(Err(message.into()))),
            calls: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Check for FakeCheck {
    async fn check(&self) -> anyhow::Result<bool> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let answer = self.answers.lock().pop_front();
        let answer = match answer {
            Some(a) => {
                *self.last.lock() = a.clone();
                a
            }
            None => self.last.lock().clone(),
        };
        answer.map_err(|msg| anyhow::anyhow!("{msg}"))
    }
}

pub fn constant(value: bool) -> FakeCheck {
    FakeCheck::sequence([value])
}

/// [`Trigger`] that counts how often it fired
#[derive(Debug, Clone, Default)]
pub struct CountingTrigger {
    fired: Arc<AtomicU32>,
    error: Option<String>,
}

impl CountingTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts, then fails every time
    pub fn failing(message: impl Into<String>) -> Self {
        Self { fired: Arc::new(AtomicU32::new(0)), error: Some(message.into()) }
    }

    pub fn count(&self) -> u32 {
        self.fired.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Trigger for CountingTrigger {
    async fn fire(&self) -> anyhow::Result<()> {
        self.fired.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(msg) => Err(anyhow::anyhow!("{msg}")),
            None => Ok(()),
        }
    }
}
