use modemprobe_core::commands::PROBE_COMMANDS;

#[test]
fn probe_list_matches_the_recipe() {
    assert_eq!(PROBE_COMMANDS.len(), 42);
    assert_eq!(PROBE_COMMANDS.first(), Some(&"+++AT"));
    assert_eq!(PROBE_COMMANDS.last(), Some(&"ATH"));
}

#[test]
fn spservice_is_probed_twice() {
    let hits = PROBE_COMMANDS
        .iter()
        .filter(|c| **c == "AT+SPSERVICE")
        .count();
    assert_eq!(hits, 2);
}

#[test]
fn no_command_carries_its_own_terminator() {
    // The dispatcher appends the CR; the list entries stay bare.
    for c in PROBE_COMMANDS {
        assert!(!c.contains('\r') && !c.contains('\n'), "{:?}", c);
    }
}
