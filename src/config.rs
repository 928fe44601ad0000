use std::time::Duration;

/// Default 7-bit bus address of the controller.
pub const DEFAULT_ADDRESS: u8 = 0x40;

// Registers
pub const MODE1: u8 = 0x00;
pub const MODE2: u8 = 0x01;
pub const SUBADR1: u8 = 0x02;
pub const SUBADR2: u8 = 0x03;
pub const SUBADR3: u8 = 0x04;
pub const PRESCALE: u8 = 0xfe;
pub const LED0_ON_L: u8 = 0x06;
pub const LED0_ON_H: u8 = 0x07;
pub const LED0_OFF_L: u8 = 0x08;
pub const LED0_OFF_H: u8 = 0x09;
pub const ALL_LED_ON_L: u8 = 0xfa;
pub const ALL_LED_ON_H: u8 = 0xfb;
pub const ALL_LED_OFF_L: u8 = 0xfc;
pub const ALL_LED_OFF_H: u8 = 0xfd;

// MODE1 bits
pub const RESTART: u8 = 0x80;
pub const SLEEP: u8 = 0x10;
pub const ALLCALL: u8 = 0x01;

// MODE2 bits
pub const INVRT: u8 = 0x10;
pub const OUTDRV: u8 = 0x04;

/// General Call software-reset byte, sent without a register-address phase.
pub const SWRST: u8 = 0x06;

/// Internal oscillator clock feeding the prescaler.
pub const OSC_CLOCK_HZ: u32 = 25_000_000;

/// Steps in one PWM period (12-bit counter).
pub const TICKS_PER_PERIOD: u16 = 4096;

/// Largest ON/OFF tick value a channel register pair can hold.
pub const TICK_MAX: u16 = 4095;

pub const CHANNEL_COUNT: u8 = 16;

/// Settle time after MODE1 transitions that touch the oscillator.
pub const OSC_SETTLE: Duration = Duration::from_millis(5);

/// The four registers holding one channel's ON/OFF tick pair.
pub struct ChannelRegisters {
    pub on_l: u8,
    pub on_h: u8,
    pub off_l: u8,
    pub off_h: u8,
}

/// Broadcast registers affecting every channel in one transition.
pub const ALL_CHANNELS: ChannelRegisters = ChannelRegisters {
    on_l: ALL_LED_ON_L,
    on_h: ALL_LED_ON_H,
    off_l: ALL_LED_OFF_L,
    off_h: ALL_LED_OFF_H,
};
