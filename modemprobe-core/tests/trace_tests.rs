use modemprobe_core::trace::{hexdump, TraceLog};

#[test]
fn hexdump_single_line() {
    let dump = hexdump(b"ATZ\r");
    let line = dump.lines().next().unwrap();
    assert!(line.starts_with("    00000000: 41 54 5a 0d"));
    assert!(line.ends_with("ATZ."));
    // 4 indent + 10 offset + 16 three-char hex slots + 1 gap + 4 ascii
    assert_eq!(line.len(), 4 + 10 + 48 + 1 + 4);
}

#[test]
fn hexdump_wraps_at_sixteen_bytes() {
    let data: Vec<u8> = (0u8..18).collect();
    let dump = hexdump(&data);
    let lines: Vec<&str> = dump.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("    00000000: 00 01 02"));
    assert!(lines[1].starts_with("    00000010: 10 11"));
}

#[test]
fn hexdump_masks_unprintable_bytes() {
    let dump = hexdump(&[0x41, 0x00, 0x7f, 0x20]);
    // ascii column shows A, two dots, and a real space
    assert!(dump.ends_with("A.. \n"));
}

#[test]
fn hexdump_of_nothing_is_nothing() {
    assert_eq!(hexdump(&[]), "");
}

#[test]
fn trace_log_records_both_directions() {
    let path = std::env::temp_dir().join(format!(
        "modemprobe-trace-test-{}.log",
        std::process::id()
    ));

    {
        let mut log = TraceLog::create(&path).unwrap();
        log.sent(b"AT\r").unwrap();
        log.received(b"OK\r\n").unwrap();
        log.note("bridge stream closed").unwrap();
    }

    let text = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert!(text.contains("sent (3 bytes)"));
    assert!(text.contains("recv (4 bytes)"));
    assert!(text.contains("41 54 0d"));
    assert!(text.contains("4f 4b 0d 0a"));
    assert!(text.contains("bridge stream closed"));
}
