//! Scripted links and sensors for host-side tests
//!
//! Every mock is a cheap handle around shared state, so a test keeps one
//! clone for inspection and hands the other to the code under test.

use core::convert::Infallible;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use stovelink_hal::{UartRx, UartTx};

use crate::traits::RangeSensor;

#[derive(Debug, Clone, Copy)]
enum WriteReply {
    Echo,
    Fixed([u8; 2]),
    Silent,
}

struct HeaterState {
    registers: HashMap<[u8; 2], Vec<u8>>,
    write_reply: WriteReply,
    pending: Vec<u8>,
    rx: VecDeque<u8>,
    written: Vec<u8>,
    flushes: usize,
}

impl HeaterState {
    /// React to the bytes written so far
    fn answer(&mut self) {
        let is_write = matches!(self.pending.first(), Some(0x80) | Some(0xA0));

        if !is_write && self.pending.len() == 2 {
            let address = [self.pending[0], self.pending[1]];
            if let Some(response) = self.registers.get(&address) {
                self.rx.extend(response.iter().copied());
            }
            self.pending.clear();
        } else if is_write && self.pending.len() == 4 {
            match self.write_reply {
                WriteReply::Echo => {
                    let (state, sum) = (self.pending[2], self.pending[3]);
                    self.rx.extend([sum, state]);
                }
                WriteReply::Fixed(reply) => self.rx.extend(reply),
                WriteReply::Silent => {}
            }
            self.pending.clear();
        }
    }
}

/// Heater service port answering from a register map
///
/// Reads of unknown registers time out. Writes are acknowledged correctly
/// unless told otherwise.
#[derive(Clone)]
pub struct MockHeater(Rc<RefCell<HeaterState>>);

impl MockHeater {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(HeaterState {
            registers: HashMap::new(),
            write_reply: WriteReply::Echo,
            pending: Vec::new(),
            rx: VecDeque::new(),
            written: Vec::new(),
            flushes: 0,
        })))
    }

    /// Answer reads of `address` with `response` (may be short)
    pub fn set_register(&self, address: [u8; 2], response: &[u8]) {
        self.0
            .borrow_mut()
            .registers
            .insert(address, response.to_vec());
    }

    /// Stop answering reads of `address`
    pub fn unplug_register(&self, address: [u8; 2]) {
        self.0.borrow_mut().registers.remove(&address);
    }

    /// `Some` answers every write with fixed bytes, `None` ignores writes
    pub fn reply_to_writes(&self, reply: Option<[u8; 2]>) {
        self.0.borrow_mut().write_reply = match reply {
            Some(bytes) => WriteReply::Fixed(bytes),
            None => WriteReply::Silent,
        };
    }

    pub fn written(&self) -> Vec<u8> {
        self.0.borrow().written.clone()
    }

    pub fn clear_written(&self) {
        self.0.borrow_mut().written.clear();
    }

    pub fn flushes(&self) -> usize {
        self.0.borrow().flushes
    }
}

impl UartTx for MockHeater {
    type Error = Infallible;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), Infallible> {
        let mut state = self.0.borrow_mut();
        for &byte in data {
            state.written.push(byte);
            state.pending.push(byte);
            state.answer();
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Infallible> {
        self.0.borrow_mut().flushes += 1;
        Ok(())
    }
}

impl UartRx for MockHeater {
    type Error = Infallible;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, Infallible> {
        Ok(pop_into(&mut self.0.borrow_mut().rx, buf))
    }

    fn available(&mut self) -> Result<usize, Infallible> {
        Ok(self.0.borrow().rx.len())
    }
}

/// Error of a host link that refuses to transmit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkDown;

#[derive(Default)]
struct HostState {
    rx: VecDeque<u8>,
    tx: Vec<u8>,
    fail_writes: bool,
}

/// Host side of the bridge link
#[derive(Clone, Default)]
pub struct MockHost(Rc<RefCell<HostState>>);

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes as if the host had sent them
    pub fn send(&self, bytes: &[u8]) {
        self.0.borrow_mut().rx.extend(bytes.iter().copied());
    }

    /// Bytes sent by the host and not yet read by the bridge
    pub fn unread(&self) -> usize {
        self.0.borrow().rx.len()
    }

    /// Take everything the bridge sent, split into frames
    pub fn take_frames(&self) -> Vec<[u8; 5]> {
        let tx = core::mem::take(&mut self.0.borrow_mut().tx);
        assert_eq!(tx.len() % 5, 0, "partial frame on host link: {:02X?}", tx);
        tx.chunks(5)
            .map(|chunk| [chunk[0], chunk[1], chunk[2], chunk[3], chunk[4]])
            .collect()
    }

    pub fn fail_writes(&self, fail: bool) {
        self.0.borrow_mut().fail_writes = fail;
    }
}

impl UartTx for MockHost {
    type Error = LinkDown;

    fn write_blocking(&mut self, data: &[u8]) -> Result<(), LinkDown> {
        let mut state = self.0.borrow_mut();
        if state.fail_writes {
            return Err(LinkDown);
        }
        state.tx.extend_from_slice(data);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), LinkDown> {
        Ok(())
    }
}

impl UartRx for MockHost {
    type Error = LinkDown;

    fn read_blocking(&mut self, buf: &mut [u8]) -> Result<usize, LinkDown> {
        Ok(pop_into(&mut self.0.borrow_mut().rx, buf))
    }

    fn available(&mut self) -> Result<usize, LinkDown> {
        Ok(self.0.borrow().rx.len())
    }
}

/// Delay that returns at once and adds up what was asked for
#[derive(Clone, Default)]
pub struct NoDelay(Rc<RefCell<u64>>);

impl NoDelay {
    pub fn total_ns(&self) -> u64 {
        *self.0.borrow()
    }
}

impl DelayNs for NoDelay {
    fn delay_ns(&mut self, ns: u32) {
        *self.0.borrow_mut() += u64::from(ns);
    }
}

/// Range sensor returning scripted readings, repeating the last one
#[derive(Clone)]
pub struct ScriptedRange(Rc<RefCell<VecDeque<u16>>>);

impl ScriptedRange {
    pub fn new(readings: &[u16]) -> Self {
        Self(Rc::new(RefCell::new(readings.iter().copied().collect())))
    }

    /// Queue a reading behind the scripted ones
    pub fn push(&self, reading: u16) {
        self.0.borrow_mut().push_back(reading);
    }

    /// Replace the script with a single repeating reading
    pub fn set(&self, reading: u16) {
        let mut readings = self.0.borrow_mut();
        readings.clear();
        readings.push_back(reading);
    }
}

impl RangeSensor for ScriptedRange {
    fn read_distance_cm(&mut self) -> u16 {
        let mut readings = self.0.borrow_mut();
        if readings.len() > 1 {
            readings.pop_front().unwrap_or(0)
        } else {
            readings.front().copied().unwrap_or(0)
        }
    }
}

fn pop_into(rx: &mut VecDeque<u8>, buf: &mut [u8]) -> usize {
    let mut count = 0;
    for slot in buf.iter_mut() {
        match rx.pop_front() {
            Some(byte) => {
                *slot = byte;
                count += 1;
            }
            None => break,
        }
    }
    count
}
