extern crate std;

use core::cell::RefCell;
use core::future::Future;
use core::pin::pin;
use core::task::{Context, Poll, Waker};
use embedded_hal::i2c::{ErrorKind, ErrorType, Operation, SevenBitAddress};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

const MAX_FAKE_PACKET_SIZE: usize = 64;

#[derive(Debug, Clone, PartialEq)]
pub struct FakePacket {
    pub addr: u8,
    pub len: usize,
    pub buf: [u8; MAX_FAKE_PACKET_SIZE],
}

impl FakePacket {
    pub fn new_from_slice(addr: u8, slice: &[u8]) -> Self {
        let src_len = slice.len();
        let mut inst = Self {
            addr,
            len: src_len,
            buf: [0; MAX_FAKE_PACKET_SIZE],
        };
        inst.buf[..src_len].copy_from_slice(slice);
        inst
    }

    pub fn bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }
}

/// Everything that happened on the fake bus and fake clock, in order
#[derive(Debug, Clone, PartialEq)]
pub enum FakeEvent {
    Sent(FakePacket),
    Received(FakePacket),
    /// A delay, in nanoseconds
    Delayed(u64),
}

pub type Journal = Rc<RefCell<Vec<FakeEvent>>>;

pub struct FakeI2cPort {
    pub available_packets: VecDeque<FakePacket>,
    journal: Journal,
    transaction_count: usize,
    fail_at: Option<usize>,
}

impl FakeI2cPort {
    pub fn new() -> Self {
        FakeI2cPort {
            available_packets: VecDeque::with_capacity(3),
            journal: Rc::new(RefCell::new(Vec::new())),
            transaction_count: 0,
            fail_at: None,
        }
    }

    /// Enqueue a packet to be received later
    pub fn add_available_packet(&mut self, bytes: &[u8]) {
        let pack = FakePacket::new_from_slice(0, bytes);
        self.available_packets.push_back(pack);
    }

    /// Make the nth transaction (counting from zero) fail
    pub fn fail_transaction(&mut self, index: usize) {
        self.fail_at = Some(index);
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    /// Only the packets written to the bus
    pub fn sent_packets(journal: &Journal) -> Vec<FakePacket> {
        journal
            .borrow()
            .iter()
            .filter_map(|ev| match ev {
                FakeEvent::Sent(p) => Some(p.clone()),
                _ => None,
            })
            .collect()
    }

    fn run(
        &mut self,
        addr: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), FakeI2cError> {
        let index = self.transaction_count;
        self.transaction_count += 1;
        if self.fail_at == Some(index) {
            return Err(FakeI2cError);
        }

        for op in operations.iter_mut() {
            match op {
                Operation::Write(bytes) => {
                    let sent_pack = FakePacket::new_from_slice(addr, bytes);
                    self.journal.borrow_mut().push(FakeEvent::Sent(sent_pack));
                }
                Operation::Read(buffer) => {
                    // reply with zeros once the queue runs dry
                    let next_pack = self
                        .available_packets
                        .pop_front()
                        .unwrap_or(FakePacket::new_from_slice(addr, &[]));
                    let read_len = buffer.len().min(next_pack.len);
                    buffer.fill(0);
                    buffer[..read_len].copy_from_slice(&next_pack.buf[..read_len]);
                    let received = FakePacket::new_from_slice(addr, buffer);
                    self.journal.borrow_mut().push(FakeEvent::Received(received));
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FakeI2cError;

impl embedded_hal::i2c::Error for FakeI2cError {
    fn kind(&self) -> ErrorKind {
        ErrorKind::Other
    }
}

impl ErrorType for FakeI2cPort {
    type Error = FakeI2cError;
}

impl embedded_hal::i2c::I2c for FakeI2cPort {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}

impl embedded_hal_async::i2c::I2c for FakeI2cPort {
    async fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        self.run(address, operations)
    }
}

/// Records delays into the journal of the port it shares
pub struct FakeDelay {
    journal: Journal,
}

impl FakeDelay {
    pub fn new() -> Self {
        Self {
            journal: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn sharing(port: &FakeI2cPort) -> Self {
        Self {
            journal: port.journal(),
        }
    }

    fn record(&mut self, ns: u64) {
        self.journal.borrow_mut().push(FakeEvent::Delayed(ns));
    }

    /// Total delay requested, in milliseconds
    pub fn total_ms(journal: &Journal) -> u64 {
        journal
            .borrow()
            .iter()
            .map(|ev| match ev {
                FakeEvent::Delayed(ns) => *ns,
                _ => 0,
            })
            .sum::<u64>()
            / 1_000_000
    }
}

impl embedded_hal::delay::DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.record(ns as u64);
    }

    fn delay_us(&mut self, us: u32) {
        self.record(us as u64 * 1_000);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.record(ms as u64 * 1_000_000);
    }
}

impl embedded_hal_async::delay::DelayNs for FakeDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.record(ns as u64);
    }

    async fn delay_us(&mut self, us: u32) {
        self.record(us as u64 * 1_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.record(ms as u64 * 1_000_000);
    }
}

/// Poll a future to completion. Nothing here ever pends, so this
/// only spins if the code under test awaits something real.
pub fn block_on<F: Future>(fut: F) -> F::Output {
    let mut fut = pin!(fut);
    let mut cx = Context::from_waker(Waker::noop());
    loop {
        if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
            return out;
        }
    }
}
