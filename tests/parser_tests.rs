//! Tokenizer behaviour on realistic slicer output.

use gcode_layer_sim::gcode::{Axes, Mnemonic, Parameter, ParseError, parse_line, strip_comment};

#[test]
fn test_slicer_header_lines() {
    let lines = [
        ";FLAVOR:Marlin",
        ";Generated with Cura_SteamEngine 5.0",
        "M140 S60",
        "M105",
        "M190 S60",
        "M104 S200",
        "M109 S200",
        "M82 ;absolute extrusion mode",
        "G92 E0",
        "G1 F2700 E-5",
        ";LAYER:0",
        "M107",
        "G0 F6000 X101.474 Y100.784 Z0.2",
    ];
    let commands: Vec<_> = lines
        .iter()
        .filter_map(|l| parse_line(l).unwrap())
        .collect();
    assert_eq!(commands.len(), 10);
    for cmd in &commands {
        assert!(cmd.mnemonic.parse::<Mnemonic>().is_ok(), "{} not recognised", cmd.mnemonic);
    }

    let last = Axes::from(commands.last().unwrap());
    assert_eq!(last.feed_rate, Some(6000));
    assert_eq!(last.x, Some(101.474));
    assert_eq!(last.z, Some(0.2));
}

#[test]
fn test_parameter_order_is_preserved() {
    let cmd = parse_line("G1 F1200 Y2 X1").unwrap().unwrap();
    let letters: Vec<char> = cmd.parameters.iter().map(|p| p.letter).collect();
    assert_eq!(letters, vec!['F', 'Y', 'X']);
}

#[test]
fn test_explicit_zero_is_not_unset() {
    let cmd = parse_line("G92 E0 X").unwrap().unwrap();
    assert_eq!(cmd.parameter('E'), Some(&Parameter { letter: 'E', value: Some(0.0) }));
    assert_eq!(cmd.parameter('X'), Some(&Parameter { letter: 'X', value: None }));
    let axes = Axes::from(&cmd);
    assert_eq!(axes.e, Some(0.0));
    assert_eq!(axes.x, None);
}

#[test]
fn test_unknown_mnemonic_still_tokenizes() {
    let cmd = parse_line("T0").unwrap().unwrap();
    assert_eq!(cmd.mnemonic, "T0");
    assert!(cmd.mnemonic.parse::<Mnemonic>().is_err());
}

#[test]
fn test_malformed_number_is_an_error() {
    assert!(matches!(
        parse_line("G1 X--1"),
        Err(ParseError::MalformedNumber { .. })
    ));
}

#[test]
fn test_strip_comment() {
    assert_eq!(strip_comment("G1 X1 ; move"), "G1 X1 ");
    assert_eq!(strip_comment(";;"), "");
    assert_eq!(strip_comment("G28"), "G28");
}
