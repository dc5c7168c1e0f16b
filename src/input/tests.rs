// SPDX-FileCopyrightText: The inpulse authors
// SPDX-License-Identifier: MPL-2.0

use super::*;

#[test]
fn button_from_u7() {
    assert_eq!(ButtonInput::Released, ButtonInput::from_u7(0x00));
    assert_eq!(ButtonInput::Pressed, ButtonInput::from_u7(0x7f));
    assert_eq!(ButtonInput::Pressed, ButtonInput::from_u7(0x40));
}

#[test]
fn step_encoder_from_u7() {
    assert_eq!(0, StepEncoderInput::from_u7(0).delta);
    assert_eq!(1, StepEncoderInput::from_u7(1).delta);
    assert_eq!(63, StepEncoderInput::from_u7(63).delta);
    assert_eq!(-64, StepEncoderInput::from_u7(64).delta);
    assert_eq!(-1, StepEncoderInput::from_u7(127).delta);
}

#[test]
#[allow(clippy::float_cmp)]
fn slider_from_u7() {
    assert_eq!(SliderInput::MIN_POSITION, SliderInput::from_u7(0).position);
    assert_eq!(
        SliderInput::MAX_POSITION,
        SliderInput::from_u7(127).position
    );
}

#[test]
#[allow(clippy::float_cmp)]
fn center_slider_from_u7() {
    assert_eq!(
        CenterSliderInput::MIN_POSITION,
        CenterSliderInput::from_u7(0).position
    );
    assert!(CenterSliderInput::MIN_POSITION < CenterSliderInput::from_u7(1).position);
    assert!(CenterSliderInput::CENTER_POSITION > CenterSliderInput::from_u7(63).position);
    assert_eq!(
        CenterSliderInput::CENTER_POSITION,
        CenterSliderInput::from_u7(64).position
    );
    assert!(CenterSliderInput::CENTER_POSITION < CenterSliderInput::from_u7(65).position);
    assert!(CenterSliderInput::MAX_POSITION > CenterSliderInput::from_u7(126).position);
    assert_eq!(
        CenterSliderInput::MAX_POSITION,
        CenterSliderInput::from_u7(127).position
    );
}

#[test]
#[allow(clippy::float_cmp)]
fn center_slider_to_unipolar() {
    assert_eq!(0.0, CenterSliderInput::from_u7(0).to_unipolar());
    assert_eq!(0.5, CenterSliderInput::from_u7(64).to_unipolar());
    assert_eq!(1.0, CenterSliderInput::from_u7(127).to_unipolar());
}

#[test]
fn address_offsets() {
    let address = ControlAddress::new(0x96, 0x60);
    assert_eq!(6, address.channel());
    assert_eq!(ControlAddress::new(0x96, 0x68), address.with_control_offset(8));
}

#[test]
fn press_edge() {
    let address = ControlAddress::new(0x91, 0x07);
    assert!(InputEvent::new(address, 0x7f).is_press());
    assert!(!InputEvent::new(address, 0x00).is_press());
}
