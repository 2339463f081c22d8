// Copyright 2025 The Rustux Authors
//
// Use of this source code is governed by a MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT

//! ITM output against a simulated trace macrocell.

use std::cell::{Cell, RefCell};
use std::fmt::Write;

use rustux_itm::regs::{ITM_TCR, ITM_TER, STIM_COUNT};
use rustux_itm::{Itm, ItmConfig, ItmError, RegisterIo};

/// A software trace packet as it would appear on SWO
#[derive(Debug, Clone, PartialEq, Eq)]
struct Packet {
    port: u8,
    payload: Vec<u8>,
}

/// ITM model with a one-entry stimulus FIFO that drains after a few polls.
struct SimItm {
    tcr: Cell<u32>,
    ter: Cell<u32>,
    pending: Cell<bool>,
    drain_after: usize,
    polls: Cell<usize>,
    packets: RefCell<Vec<Packet>>,
    overruns: Cell<usize>,
}

impl SimItm {
    fn new(drain_after: usize) -> Self {
        Self {
            tcr: Cell::new(0),
            ter: Cell::new(0),
            pending: Cell::new(false),
            drain_after,
            polls: Cell::new(0),
            packets: RefCell::new(Vec::new()),
            overruns: Cell::new(0),
        }
    }

    fn stim_port(offset: usize) -> Option<u8> {
        (offset < STIM_COUNT * 4).then(|| (offset / 4) as u8)
    }

    fn push(&self, offset: usize, payload: &[u8]) {
        let Some(port) = Self::stim_port(offset) else {
            return;
        };
        if self.pending.get() {
            self.overruns.set(self.overruns.get() + 1);
            return;
        }
        self.pending.set(true);
        self.polls.set(0);
        self.packets.borrow_mut().push(Packet {
            port,
            payload: payload.to_vec(),
        });
    }

    fn text(&self, port: u8) -> String {
        self.packets
            .borrow()
            .iter()
            .filter(|p| p.port == port)
            .map(|p| p.payload[0] as char)
            .collect()
    }
}

impl RegisterIo for SimItm {
    fn read32(&self, offset: usize) -> u32 {
        if Self::stim_port(offset).is_some() {
            if self.pending.get() {
                let polls = self.polls.get() + 1;
                self.polls.set(polls);
                if polls >= self.drain_after {
                    self.pending.set(false);
                }
            }
            return (!self.pending.get()) as u32;
        }
        match offset {
            ITM_TCR => self.tcr.get(),
            ITM_TER => self.ter.get(),
            _ => 0,
        }
    }

    fn write32(&self, offset: usize, value: u32) {
        match offset {
            ITM_TCR => self.tcr.set(value),
            ITM_TER => self.ter.set(value),
            _ => self.push(offset, &value.to_le_bytes()),
        }
    }

    fn write16(&self, offset: usize, value: u16) {
        self.push(offset, &value.to_le_bytes());
    }

    fn write8(&self, offset: usize, value: u8) {
        self.push(offset, &[value]);
    }
}

#[test]
fn boot_sequence_then_characters() {
    let sim = SimItm::new(3);
    let itm = Itm::new(&sim);

    itm.init();
    assert_eq!(sim.tcr.get(), 0x0001_000D);
    assert_eq!(sim.ter.get(), 0x0000_0001);

    for b in b"OK" {
        itm.send_char(*b);
    }

    assert_eq!(sim.overruns.get(), 0);
    assert_eq!(
        *sim.packets.borrow(),
        vec![
            Packet { port: 0, payload: vec![b'O', 0, 0, 0] },
            Packet { port: 0, payload: vec![b'K', 0, 0, 0] },
        ]
    );
}

#[test]
fn strings_never_overrun_the_fifo() {
    let sim = SimItm::new(5);
    let itm = Itm::with_options(&sim, true);
    itm.init();

    itm.write_str(0, "line one\nline two\n");

    assert_eq!(sim.overruns.get(), 0);
    assert_eq!(sim.text(0), "line one\r\nline two\r\n");
}

#[test]
fn formatted_output_on_a_second_port() {
    let sim = SimItm::new(2);
    let itm = Itm::new(&sim);
    itm.init_with(&ItmConfig::new().enable_port(4)).unwrap();
    assert!(itm.port_enabled(4));

    write!(itm.writer(4), "x={:02}", 7).unwrap();
    assert_eq!(sim.text(4), "x=07");
    assert_eq!(sim.text(0), "");
}

#[test]
fn checked_send_respects_configuration() {
    let sim = SimItm::new(2);
    let itm = Itm::new(&sim);

    assert_eq!(itm.try_send(0, b'a', 100), Err(ItmError::Disabled));

    let config = ItmConfig::from_cmdline("itm.ports=0x2 itm.timestamps");
    itm.init_with(&config).unwrap();
    assert_eq!(sim.tcr.get(), 0x0001_000F);

    assert_eq!(itm.try_send(0, b'a', 100), Err(ItmError::PortDisabled(0)));
    assert_eq!(itm.try_send(1, b'b', 100), Ok(()));

    // FIFO still holds 'b' and needs two polls to drain.
    assert_eq!(itm.try_send(1, b'c', 1), Err(ItmError::TimedOut));
    assert_eq!(itm.try_send(1, b'c', 100), Ok(()));
    assert_eq!(sim.text(1), "bc");
}

#[test]
fn disable_stops_checked_output() {
    let sim = SimItm::new(1);
    let itm = Itm::new(&sim);
    itm.init();
    itm.disable();

    assert_eq!(sim.ter.get(), 0);
    assert_eq!(sim.tcr.get(), 0x0001_000C);
    assert_eq!(itm.try_send(0, b'a', 10), Err(ItmError::Disabled));
}

#[test]
fn wide_stores_make_wide_packets() {
    let sim = SimItm::new(1);
    let itm = Itm::new(&sim);
    itm.init();

    itm.write_u16(2, 0xBEEF);
    itm.write_u32(3, 0x0102_0304);

    assert_eq!(
        *sim.packets.borrow(),
        vec![
            Packet { port: 2, payload: vec![0xEF, 0xBE] },
            Packet { port: 3, payload: vec![0x04, 0x03, 0x02, 0x01] },
        ]
    );
}
