use lws_envelope_core::{
    baking::{bake_envelope, bake_motion, BakingConfig},
    parse_envelope_json, parse_motion_json, Behavior, Channel, Envelope, Shape,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn load(name: &str) -> Envelope {
    let json = lws_test_fixtures::envelopes::json(name).expect("load envelope fixture");
    parse_envelope_json(&json).expect("parse envelope fixture")
}

#[test]
fn every_fixture_parses_and_reproduces_its_keys() {
    let names = lws_test_fixtures::envelopes::names();
    assert!(!names.is_empty());
    for name in names {
        let env = load(name);
        assert!(env.len() >= 2, "{name} should have several keys");
        for key in env.keys() {
            assert_eq!(env.eval(key.time), key.value, "{name}: key at {}", key.time);
        }
    }
}

#[test]
fn ramp_fixture_matches_scenario() {
    let env = load("ramp-constant");
    assert_eq!(env.pre(), Behavior::Constant);
    assert_eq!(env.post(), Behavior::Constant);
    let expected = [(-1.0, 0.0), (0.0, 0.0), (0.5, 5.0), (1.0, 10.0), (2.0, 10.0)];
    for (t, v) in expected {
        approx(env.eval(t), v, 1e-6);
    }
}

#[test]
fn tcb_wave_fixture_repeats() {
    let env = load("tcb-wave");
    assert!(env.keys().iter().all(|k| k.shape == Shape::Tcb));
    assert_eq!(env.pre(), Behavior::Repeat);
    for t in [0.2, 0.7, 1.1, 1.6] {
        approx(env.eval(t - 4.0), env.eval(t), 1e-4);
        approx(env.eval(t + 6.0), env.eval(t), 1e-4);
    }
}

#[test]
fn bezier2_fixture_eases_and_extends_linearly() {
    let env = load("bezier2-ease");
    approx(env.eval(0.5), 0.5, 1e-4);
    // flat handles at both ends of the first span
    assert!(env.eval(0.05) < 0.05);
    assert!(env.eval(0.95) > 0.95);
    // post behavior continues along the last incoming handle: slope 1
    approx(env.eval(4.0) - env.eval(3.5), 0.5, 1e-5);
    assert_eq!(env.eval(-2.0), 0.0);
}

#[test]
fn hermite_loop_fixture_offsets_and_oscillates() {
    let env = load("hermite-loop");
    let shift = 4.0 - 1.0;
    for t in [0.25, 0.9, 1.5] {
        approx(env.eval(t + 2.0), env.eval(t) + shift, 1e-4);
        // the first cycle before the keys runs backwards
        approx(env.eval(-t), env.eval(t), 1e-4);
    }
}

#[test]
fn mixed_fixture_shapes_and_reset_tail() {
    let env = load("mixed-shapes");
    // the span ending on the stepped key holds the earlier value
    approx(env.eval(0.2), 2.0, 1e-6);
    approx(env.eval(0.45), 2.0, 1e-6);
    // reset after the last key
    assert_eq!(env.eval(2.5), 0.0);
    // pre linear continues the first tcb tangent
    let slope = env.eval(-1.5) - env.eval(-2.0);
    approx(env.eval(-2.5), env.eval(-2.0) - slope, 1e-4);
}

#[test]
fn fixture_bake_has_expected_frames() {
    let env = load("tcb-wave");
    let cfg = BakingConfig {
        frame_rate: 30.0,
        ..Default::default()
    };
    let baked = bake_envelope(&env, &cfg).expect("bake");
    assert_eq!(baked.values.len(), 61);
    approx(baked.values[15], 1.0, 1e-5);
    approx(*baked.values.last().unwrap(), 0.0, 1e-6);
}

#[test]
fn every_motion_fixture_parses_and_round_trips() {
    let names = lws_test_fixtures::motions::names();
    assert!(!names.is_empty());
    for name in names {
        let json = lws_test_fixtures::motions::json(name).expect("motion fixture");
        let motion = parse_motion_json(&json).expect("parse motion");
        assert!(motion.channels().count() > 0, "{name} has no channels");
        let exported = lws_envelope_core::export_motion_json(&motion).to_string();
        assert_eq!(parse_motion_json(&exported).expect("reparse"), motion);
    }
    assert!(lws_test_fixtures::motions::json("missing").is_err());
}

#[test]
fn motion_fixture_evaluates_channels() {
    let json = lws_test_fixtures::motions::json("spinning-cube").expect("motion fixture");
    let motion = parse_motion_json(&json).expect("parse motion");

    assert!(motion.channel(Channel::PositionY).is_some());
    assert!(motion.channel(Channel::PositionX).is_none());
    assert_eq!(motion.time_range(), Some((0.0, 2.0)));

    let s = motion.eval(1.0);
    approx(s.position[1], 2.0, 1e-6);
    approx(s.rotation[0], std::f32::consts::PI, 1e-5);
    assert_eq!(s.position[0], 0.0);
    assert_eq!(s.scale[0], 1.0);
    // oscillating scale: 0.75 mirrors 0.25
    approx(s.scale[1], motion.eval(0.0).scale[1], 1e-6);
    approx(motion.eval(0.75).scale[1], motion.eval(0.25).scale[1], 1e-5);

    // offset repeat keeps heading turning
    approx(
        motion.eval(3.0).rotation[0],
        std::f32::consts::PI * 3.0,
        1e-4,
    );

    let baked = bake_motion(&motion, &BakingConfig {
        frame_rate: 10.0,
        ..Default::default()
    })
    .expect("bake motion");
    assert_eq!(baked.samples.len(), 21);
    assert_eq!(baked.samples[10], s);
}
