#![cfg(feature = "cli")]
#![allow(clippy::expect_used)]

use std::process::Command;

const MEMDUMP_EXE: &str = env!("CARGO_BIN_EXE_memdump");

#[test]
fn test_memdump_shows_help() {
    for flag in ["--help", "help", "-h"] {
        // Act
        let output = Command::new(MEMDUMP_EXE)
            .arg(flag)
            .output()
            .expect("Failed to run memdump");

        // Assert
        assert!(
            output.status.success(),
            "command failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(
            stdout.contains("Usage"),
            "stdout did not look like help text:\n{stdout}"
        );
    }
}

#[test]
fn test_memdump_dump_valid() {
    // Act
    let output = Command::new(MEMDUMP_EXE)
        .args([
            "dump",
            "tests/fixtures/hello.bin",
            "--address",
            "0x1000",
            "--bpl",
            "8",
        ])
        .output()
        .expect("Failed to run memdump");

    // Assert
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(" 0000000000001000 |48 65 6c 6c 6f 2c 20 6d |Hello,.m")
            && stdout.contains(" 0000000000001010 |65 77 65 72 21 0a"),
        "stdout did not look like a dump:\n{stdout}"
    );
}

#[test]
fn test_memdump_dump_with_config() {
    // Act
    let output = Command::new(MEMDUMP_EXE)
        .args([
            "dump",
            "tests/fixtures/hello.bin",
            "--config",
            "tests/fixtures/memview.toml",
        ])
        .output()
        .expect("Failed to run memdump");

    // Assert
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains(" 00000008 |65 6d 6f 72 79 20 76 69 |emory.vi"),
        "stdout did not use the configured layout:\n{stdout}"
    );
}

#[test]
fn test_memdump_dump_invalid() {
    // Act - missing input path
    let output = Command::new(MEMDUMP_EXE)
        .args(["dump"])
        .output()
        .expect("Failed to run memdump");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Missing input file path"),
        "stderr did not contain expected error text:\n{stderr}"
    );

    // Act - input does not exist
    let output = Command::new(MEMDUMP_EXE)
        .args(["dump", "tests/fixtures/nope.bin"])
        .output()
        .expect("Failed to run memdump");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("File not found"),
        "stderr did not contain expected error text:\n{stderr}"
    );

    // Act - invalid settings
    let output = Command::new(MEMDUMP_EXE)
        .args([
            "dump",
            "tests/fixtures/hello.bin",
            "--config",
            "tests/fixtures/invalid.toml",
        ])
        .output()
        .expect("Failed to run memdump");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("bytes_per_line"),
        "stderr did not contain expected error text:\n{stderr}"
    );
}

#[test]
fn test_memdump_diff_moving_start() {
    // Act
    let output = Command::new(MEMDUMP_EXE)
        .args([
            "diff",
            "tests/fixtures/stack_old.bin",
            "tests/fixtures/stack_new.bin",
            "--old-address",
            "0x64",
            "--new-address",
            "0x62",
        ])
        .output()
        .expect("Failed to run memdump");

    // Assert
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Changed: 3 of 6 bytes")
            && stdout.contains("0x62..=0x63")
            && stdout.contains("  0x66"),
        "stdout did not list the changed bytes:\n{stdout}"
    );
}

#[test]
fn test_memdump_diff_colored() {
    // Act
    let output = Command::new(MEMDUMP_EXE)
        .args([
            "diff",
            "tests/fixtures/stack_old.bin",
            "tests/fixtures/stack_new.bin",
            "--color",
        ])
        .output()
        .expect("Failed to run memdump");

    // Assert
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("\x1b[31m5\x1b[0m\x1b[31m8\x1b[0m"),
        "stdout did not mark the changed bytes:\n{stdout}"
    );
}

#[test]
fn test_memdump_search() {
    // Act
    let output = Command::new(MEMDUMP_EXE)
        .args([
            "search",
            "tests/fixtures/hello.bin",
            "--ascii",
            "mem",
            "--address",
            "0x1000",
        ])
        .output()
        .expect("Failed to run memdump");

    // Assert
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("Hits: 1") && stdout.contains("0x1007"),
        "stdout did not list the match:\n{stdout}"
    );
}

#[test]
fn test_memdump_search_invalid_pattern() {
    // Act
    let output = Command::new(MEMDUMP_EXE)
        .args(["search", "tests/fixtures/hello.bin", "--hex", "abc"])
        .output()
        .expect("Failed to run memdump");

    // Assert
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid hex pattern"),
        "stderr did not contain expected error text:\n{stderr}"
    );
}
