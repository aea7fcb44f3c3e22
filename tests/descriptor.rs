mod common;

use common::{Bench, SUPPLY_MV, comp_snapshot};
use msp432_comp::{
    Error,
    comp::{
        Channel, CompConfig, CompE, FilterDelay, OutputPolarity, PowerMode, RefTap,
        ReferenceBase, ReferenceDivider, Terminal, ThresholdMode,
    },
    config::{COMP_CONFIG, VREF_HALF_VCC},
};

const FILTERS: [FilterDelay; 5] = [
    FilterDelay::Off,
    FilterDelay::Level1,
    FilterDelay::Level2,
    FilterDelay::Level3,
    FilterDelay::Level4,
];

const POLARITIES: [OutputPolarity; 2] = [OutputPolarity::NotInverted, OutputPolarity::Inverted];

const POWER_MODES: [PowerMode; 3] = [
    PowerMode::HighSpeed,
    PowerMode::Normal,
    PowerMode::UltraLowPower,
];

fn terminals() -> impl Iterator<Item = Terminal> {
    core::iter::once(Terminal::Vref).chain(Channel::ALL.into_iter().map(Terminal::Pin))
}

#[test]
fn init_then_read_back() {
    let bench = Bench::new();
    let comp = CompE::from_registers(&bench.comp);
    let mut checked = 0;

    for positive in terminals() {
        for negative in terminals() {
            for filter in FILTERS {
                for polarity in POLARITIES {
                    for power in POWER_MODES {
                        let Ok(cfg) =
                            CompConfig::try_new(positive, negative, filter, polarity, power)
                        else {
                            continue;
                        };

                        // Registers left over from the previous configuration.
                        comp.init(&cfg);

                        assert_eq!(comp.config(), Some(cfg));
                        assert!(!comp.is_enabled());
                        checked += 1;
                    }
                }
            }
        }
    }

    // 17 sources per terminal; Vref twice, and each channel twice, are out.
    assert_eq!(checked, (17 * 17 - 17) * 5 * 2 * 3);
}

#[test]
fn invalid_routing_rejected() {
    assert_eq!(
        CompConfig::try_new(
            Terminal::Vref,
            Terminal::Vref,
            FilterDelay::Level4,
            OutputPolarity::NotInverted,
            PowerMode::HighSpeed,
        ),
        Err(Error::InvalidRouting)
    );
}

#[test]
fn half_vcc_is_single_threshold() {
    assert_eq!(VREF_HALF_VCC.mode(), ThresholdMode::Single);

    let (lower, upper) = VREF_HALF_VCC.threshold_mv(SUPPLY_MV);
    assert_eq!(lower, upper);
    assert_eq!(upper, SUPPLY_MV * 16 / 32);
}

#[test]
fn unequal_taps_give_two_trip_points() {
    for (lo, hi) in [(1, 2), (15, 17), (8, 24), (31, 32)] {
        let reference =
            ReferenceDivider::new(ReferenceBase::Vcc, RefTap::new(lo), RefTap::new(hi));
        let (lower, upper) = reference.threshold_mv(3_200);

        assert_eq!(reference.mode(), ThresholdMode::Hysteresis);
        assert!(lower < upper);
        assert_eq!(upper - lower, 3_200 * u32::from(hi - lo) / 32);
    }
}

#[test]
fn reference_and_buffer_commute() {
    let references = [
        VREF_HALF_VCC,
        ReferenceDivider::new(ReferenceBase::Vcc, RefTap::new(4), RefTap::new(28)),
        ReferenceDivider::new(ReferenceBase::Shared2V5, RefTap::new(32), RefTap::new(32)),
    ];

    for reference in references {
        for channel in Channel::ALL {
            let a = Bench::new();
            let b = Bench::new();
            let comp_a = CompE::from_registers(&a.comp);
            let comp_b = CompE::from_registers(&b.comp);

            comp_a.init(&COMP_CONFIG);
            comp_a.set_reference_voltage(&reference);
            comp_a.disable_input_buffer(channel);

            comp_b.init(&COMP_CONFIG);
            comp_b.disable_input_buffer(channel);
            comp_b.set_reference_voltage(&reference);

            assert_eq!(comp_snapshot(&a.comp), comp_snapshot(&b.comp));
        }
    }
}

#[test]
fn reference_survives_buffer_disable() {
    let bench = Bench::new();
    let comp = CompE::from_registers(&bench.comp);

    comp.init(&COMP_CONFIG);
    comp.set_reference_voltage(&VREF_HALF_VCC);
    comp.disable_input_buffer(Channel::C9);

    assert_eq!(comp.reference(), Some(VREF_HALF_VCC));
    assert_eq!(comp.config(), Some(COMP_CONFIG));
    assert!(comp.input_buffer_disabled(Channel::C2));
    assert!(comp.input_buffer_disabled(Channel::C9));
}
