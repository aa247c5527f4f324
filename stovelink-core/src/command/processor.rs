//! Host command processor
//!
//! Reads 4-byte frames while at least one full frame is pending, validates
//! them and turns heater requests into verified register writes. Every
//! reply goes straight out on the host link; the returned log only tells
//! the caller what happened.

use embedded_hal::delay::DelayNs;
use heapless::Vec;
use stovelink_hal::Uart;
use stovelink_protocol::{
    AckCode, AckNak, DeviceId, HostRequest, InboundFrame, INBOUND_FRAME_LEN, META_CHANNEL,
};

use crate::device::{Heater, WriteCommand, WriteResult};
use crate::host::HostPort;
use crate::scheduler::CycleState;

/// Outcomes kept per drain; frames past this are still handled
pub const MAX_LOGGED_COMMANDS: usize = 8;

/// What became of one inbound frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandOutcome {
    /// Checksum mismatch; controller NAK sent, drain stopped
    BadChecksum { frame: InboundFrame },
    /// Forced report armed for the next cycle; ACK sent
    ForceResend,
    /// Heater confirmed the write; ACK sent
    Accepted {
        device: DeviceId,
        request: HostRequest,
    },
    /// Heater answered with the wrong bytes; device NAK sent
    DeviceRejected { device: DeviceId, response: [u8; 2] },
    /// Heater did not answer the write; nothing sent
    NoResponse { device: DeviceId },
    /// Valid frame asking for nothing the bridge does; nothing sent
    Ignored { frame: InboundFrame },
}

/// Outcomes of one drain, in arrival order
pub type CommandLog = Vec<CommandOutcome, MAX_LOGGED_COMMANDS>;

/// Drains and executes host commands
#[derive(Debug, Clone, Copy)]
pub struct CommandProcessor {
    settle_delay_ms: u32,
}

impl CommandProcessor {
    /// `settle_delay_ms` is how long to wait for the rest of a frame
    pub fn new(settle_delay_ms: u32) -> Self {
        Self { settle_delay_ms }
    }

    /// Handle every complete frame that is pending
    ///
    /// Stops at the first checksum failure, leaving any bytes after the bad
    /// frame where they are.
    pub fn drain<H, L, D>(
        &self,
        host: &mut HostPort<H>,
        heaters: &mut [Heater<L>; 2],
        cycle: &mut CycleState,
        delay: &mut D,
    ) -> CommandLog
    where
        H: Uart,
        L: Uart,
        D: DelayNs,
    {
        let mut log = CommandLog::new();

        self.settle(host, delay);
        while host.pending() >= INBOUND_FRAME_LEN {
            let Some(bytes) = host.read_frame() else {
                break;
            };

            let outcome = self.handle(InboundFrame::from_bytes(bytes), host, heaters, cycle);
            let _ = log.push(outcome);
            if matches!(outcome, CommandOutcome::BadChecksum { .. }) {
                break;
            }

            self.settle(host, delay);
        }

        log
    }

    /// Handle one frame
    pub fn handle<H: Uart, L: Uart>(
        &self,
        frame: InboundFrame,
        host: &mut HostPort<H>,
        heaters: &mut [Heater<L>; 2],
        cycle: &mut CycleState,
    ) -> CommandOutcome {
        if frame.verify().is_err() {
            host.send(reply(&frame, AckCode::ControllerNak));
            return CommandOutcome::BadChecksum { frame };
        }

        let request = HostRequest::from_frame(&frame);
        let device = match request {
            HostRequest::ForceResend => {
                cycle.request_force();
                host.send(reply(&frame, AckCode::Ack));
                return CommandOutcome::ForceResend;
            }
            HostRequest::Switch { device, .. } | HostRequest::SetPower { device, .. } => device,
            HostRequest::Unsupported => return CommandOutcome::Ignored { frame },
        };

        let heater = &mut heaters[device.index()];
        let Some(write) = WriteCommand::for_request(heater.profile(), &request) else {
            return CommandOutcome::Ignored { frame };
        };

        match heater.execute(&write) {
            WriteResult::Acknowledged => {
                host.send(reply(&frame, AckCode::Ack));
                CommandOutcome::Accepted { device, request }
            }
            WriteResult::Rejected { response } => {
                host.send(reply(&frame, AckCode::DeviceNak));
                CommandOutcome::DeviceRejected { device, response }
            }
            WriteResult::NoResponse => CommandOutcome::NoResponse { device },
        }
    }

    /// Throw away stray bytes left on the host link
    ///
    /// Anything discarded is answered with a controller NAK on the meta
    /// channel. Returns the number of bytes dropped.
    pub fn purge<H: Uart>(&self, host: &mut HostPort<H>) -> usize {
        let dropped = host.discard_pending();
        if dropped > 0 {
            host.send(AckNak {
                device_id: META_CHANNEL,
                code: AckCode::ControllerNak,
                command_type: AckCode::ControllerNak.to_byte(),
            });
        }
        dropped
    }

    /// Give a partly received frame time to complete
    fn settle<H: Uart, D: DelayNs>(&self, host: &mut HostPort<H>, delay: &mut D) {
        let pending = host.pending();
        if pending > 0 && pending < INBOUND_FRAME_LEN {
            delay.delay_ms(self.settle_delay_ms);
        }
    }
}

/// Acknowledgement echoing the frame's device id and command type
fn reply(frame: &InboundFrame, code: AckCode) -> AckNak {
    AckNak {
        device_id: frame.device_id,
        code,
        command_type: frame.command_type,
    }
}
