// SPDX-License-Identifier: MIT

#![cfg(feature = "cli")]

use assert_cmd::Command;
use predicates::prelude::*;

const MOUSE_RDESC: &str = "05 01 09 02 a1 01 09 01 a1 00 05 09 19 01 29 03 15 00 25 01 95 03 75 01 \
                           81 02 95 01 75 05 81 03 05 01 09 30 09 31 15 81 25 7f 75 08 95 02 81 06 \
                           c0 c0";

fn hidfield() -> Command {
    Command::cargo_bin("hidfield").unwrap()
}

#[test]
fn lists_reports() {
    hidfield()
        .args(["--hex", MOUSE_RDESC])
        .assert()
        .success()
        .stdout(predicate::str::contains("Input ReportID: 0x00, NumBytes: 3"));
}

#[test]
fn decodes_field_with_names() {
    hidfield()
        .args(["--hex", MOUSE_RDESC])
        .args(["--report", "00 05 fb", "--usage-page", "0x01", "--usage", "0x30"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generic Desktop (0x0001) X (0x0030)"))
        .stdout(predicate::str::contains("signed:   5"));

    hidfield()
        .args(["--hex", MOUSE_RDESC])
        .args(["--report", "00 05 fb", "--usage-page", "1", "--usage", "0x31"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generic Desktop (0x0001) Y (0x0031)"))
        .stdout(predicate::str::contains("signed:   -5"));
}

#[test]
fn parse_error_is_human_readable() {
    hidfield()
        .args(["--hex", "b4"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: Global Stack is Empty"))
        .stderr(predicate::str::contains("GlobalStackEmpty").not());
}

#[test]
fn missing_field() {
    hidfield()
        .args(["--hex", MOUSE_RDESC])
        .args(["--report", "00 05 fb", "--usage-page", "0x01", "--usage", "0x38"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No field for usage"));
}
