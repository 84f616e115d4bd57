//! Speaker output of the micro:bit v2.

use bsp::hal::{
    gpio::{Output, Pin, PushPull},
    pwm::{self, Channel, Prescaler, Pwm},
    time::Hertz,
};
use fugit::HertzU32;
use tunebox::{Buzzer, Duration, Instant};

/// Square wave on one PWM channel, switched off by [`Buzzer::update`] once
/// the requested duration has passed.
pub struct PwmBuzzer<T: pwm::Instance> {
    pwm: Pwm<T>,
    now: Instant,
    silence_at: Option<Instant>,
}

impl<T: pwm::Instance> PwmBuzzer<T> {
    pub fn new(pwm: T, pin: Pin<Output<PushPull>>) -> Self {
        let pwm = Pwm::new(pwm);
        // 500 kHz counter: the 15-bit period covers 30 Hz .. 4.2 kHz
        pwm.set_output_pin(Channel::C0, pin)
            .set_prescaler(Prescaler::Div32);
        pwm.disable();

        PwmBuzzer {
            pwm,
            now: Instant::from_ticks(0),
            silence_at: None,
        }
    }

    fn silence(&mut self) {
        self.pwm.disable();
        self.silence_at = None;
    }
}

impl<T: pwm::Instance> Buzzer for PwmBuzzer<T> {
    fn tone(&mut self, frequency: HertzU32, duration: Duration) {
        defmt::trace!("tone: {}Hz for {}ms", frequency.raw(), duration.ticks());

        self.pwm.set_period(Hertz(frequency.raw()));
        self.pwm.set_duty_on_common(self.pwm.max_duty() / 2);
        self.pwm.enable();
        self.silence_at = Some(self.now + duration);
    }

    fn update(&mut self, now: Instant) {
        self.now = now;
        if matches!(self.silence_at, Some(at) if now >= at) {
            self.silence();
        }
    }
}
