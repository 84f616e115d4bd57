#![no_std]
#![no_main]

extern crate microbit as bsp; // board support package

mod board;

use defmt_rtt as _;
use panic_probe as _;

#[rtic::app(device = bsp::pac, peripherals = true, dispatchers = [SWI0_EGU0])]
mod app {
    use bsp::{
        hal::{
            gpio::{Input, Level, Pin, PullUp},
            gpiote::*,
        },
        pac::PWM0,
        Board,
    };
    use embedded_hal::digital::v2::InputPin;
    use fugit::ExtU64;
    use systick_monotonic::*;
    use tunebox::{melody::MELODIES, Player};

    use crate::board::PwmBuzzer;

    /// Shorter than a sixteenth note at T200 (75ms).
    const UPDATE_PERIOD_MS: u64 = 5;
    const DEBOUNCE_MS: u64 = 50;

    #[monotonic(binds = SysTick, default = true)]
    type Timer = Systick<1000>;

    #[shared]
    struct Shared {
        gpiote: Gpiote,
        player: Player<'static, PwmBuzzer<PWM0>>,
    }

    #[local]
    struct Local {
        btn1: Pin<Input<PullUp>>,
        btn2: Pin<Input<PullUp>>,
        next_melody: usize,
    }

    #[init]
    fn init(ctx: init::Context) -> (Shared, Local, init::Monotonics) {
        defmt::debug!("init tunebox");

        let Board {
            buttons,
            speaker_pin,
            GPIOTE,
            PWM0,
            SYST,
            ..
        } = Board::new(ctx.device, ctx.core);

        let btn1 = buttons.button_a.into_pullup_input().degrade();
        let btn2 = buttons.button_b.into_pullup_input().degrade();

        let gpiote = Gpiote::new(GPIOTE);

        gpiote
            .channel0()
            .input_pin(&btn1)
            .hi_to_lo()
            .enable_interrupt();
        gpiote
            .channel1()
            .input_pin(&btn2)
            .hi_to_lo()
            .enable_interrupt();

        let speaker = speaker_pin.into_push_pull_output(Level::Low).degrade();
        let player = Player::new(PwmBuzzer::new(PWM0, speaker));

        let mono = Systick::new(SYST, 64_000_000);

        update::spawn().ok();

        (
            Shared { gpiote, player },
            Local {
                btn1,
                btn2,
                next_melody: 0,
            },
            init::Monotonics(mono),
        )
    }

    #[task(shared = [player])]
    fn update(mut ctx: update::Context) {
        let now = monotonics::now();
        ctx.shared.player.lock(|player| player.update(now));

        update::spawn_after(UPDATE_PERIOD_MS.millis()).ok();
    }

    #[task(binds = GPIOTE, shared = [gpiote])]
    fn on_gpiote(mut ctx: on_gpiote::Context) {
        defmt::debug!("gpiote interrupt");
        ctx.shared.gpiote.lock(|gpiote| {
            gpiote.reset_events();

            handle_btn_event::spawn_after(DEBOUNCE_MS.millis()).ok();
        });
    }

    #[task(shared = [player], local = [btn1, btn2, next_melody])]
    fn handle_btn_event(mut ctx: handle_btn_event::Context) {
        let btn1_pressed = matches!(ctx.local.btn1.is_low(), Ok(true));
        let btn2_pressed = matches!(ctx.local.btn2.is_low(), Ok(true));
        let next_melody = ctx.local.next_melody;

        ctx.shared.player.lock(|player| {
            match (btn1_pressed, btn2_pressed) {
                (true, false) => {
                    defmt::info!("A: melody {}", *next_melody);
                    player.play(MELODIES[*next_melody], monotonics::now());
                    *next_melody = (*next_melody + 1) % MELODIES.len();
                }
                (false, true) | (true, true) => {
                    defmt::info!("B: stop");
                    player.stop();
                }
                (false, false) => {}
            }
        });
    }

    #[idle]
    fn idle(_ctx: idle::Context) -> ! {
        loop {
            cortex_m::asm::wfi();
        }
    }
}
