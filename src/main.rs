use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::{debug, LevelFilter};

use pca9685_servo::config::DEFAULT_ADDRESS;
use pca9685_servo::{I2cTools, I2cTransport, Pca9685};

// Servo policy, not chip-driver constants. Pulse lengths are ticks out of
// the 4096-step period at 60 Hz.
const SERVO_MIN: u16 = 150;
const SERVO_MAX: u16 = 600;
const SERVO_FREQ_HZ: f64 = 60.0;
const SWING_INTERVAL: Duration = Duration::from_secs(1);

/// Drive servos on a PCA9685 PWM controller through i2c-tools
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable debug-level logging
    #[arg(short, long)]
    verbose: bool,

    /// I2C bus number
    #[arg(short, long, default_value_t = 0)]
    bus: u32,

    /// 7-bit I2C address of the controller
    #[arg(short, long, default_value_t = DEFAULT_ADDRESS,
          value_parser = clap::value_parser!(u8).range(..128))]
    address: u8,

    /// Mode of servo
    #[arg(short, long, value_enum, default_value_t = Mode::Stop)]
    mode: Mode,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
#[value(rename_all = "snake_case")]
enum Mode {
    Stop,
    SwingCh0,
    SwingCh1,
    SwingAll,
    ForwardAll,
    BackwardAll,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Error
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
    debug!("args: {args:?}");

    let mut pwm = Pca9685::new(I2cTools::new(), args.bus, args.address)?;

    match args.mode {
        Mode::Stop => {
            println!("trying to reset...");
            pwm.software_reset()?;
        }
        Mode::ForwardAll => {
            pwm.set_pwm_freq(SERVO_FREQ_HZ)?;
            pwm.set_all_pwm(0, SERVO_MIN)?;
        }
        Mode::BackwardAll => {
            pwm.set_pwm_freq(SERVO_FREQ_HZ)?;
            pwm.set_all_pwm(0, SERVO_MAX)?;
        }
        Mode::SwingAll => {
            pwm.set_pwm_freq(SERVO_FREQ_HZ)?;
            println!("Moving servo on every channel, press Ctrl-C to quit...");
            swing(|pwm, off| pwm.set_all_pwm(0, off), &mut pwm)?;
        }
        Mode::SwingCh0 | Mode::SwingCh1 => {
            let channel = match args.mode {
                Mode::SwingCh0 => 0,
                _ => 1,
            };
            pwm.set_pwm_freq(SERVO_FREQ_HZ)?;
            println!("Moving servo on channel {channel}, press Ctrl-C to quit...");
            swing(|pwm, off| pwm.set_pwm(channel, 0, off), &mut pwm)?;
        }
    }

    Ok(())
}

/// Bounce between the pulse-length extremes until the process is killed.
fn swing<T, F>(mut apply: F, pwm: &mut Pca9685<T>) -> Result<()>
where
    T: I2cTransport,
    F: FnMut(&mut Pca9685<T>, u16) -> Result<(), pca9685_servo::Pca9685Error>,
{
    loop {
        apply(pwm, SERVO_MIN)?;
        thread::sleep(SWING_INTERVAL);
        apply(pwm, SERVO_MAX)?;
        thread::sleep(SWING_INTERVAL);
    }
}
