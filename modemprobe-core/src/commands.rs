//! The fixed batch of AT commands thrown at the modem, in order.
//!
//! Which of these answer varies by device and provider; the point of the
//! run is to find out. `AT+SPSERVICE` really is in here twice: the second
//! attempt sometimes answers after the first has woken the service side.

pub const PROBE_COMMANDS: &[&str] = &[
    "+++AT",
    "AT",
    "AT&F",
    "ATZ",
    "ATS0=0",
    "ATE0",
    "ATE0V1",
    "ATE0V1Q0X4",
    "AT+CRC=1",
    "AT+SPSERVICE",
    "AT+SPSERVICE",
    "AT$QCMIPP?",
    "AT$QCMIPP=?",
    "AT+CSQ",
    "AT+CSQ?",
    "AT+CSQ=?",
    "AT+CSS",
    "AT+CSS?",
    "AT+CSS=?",
    "ATI1",
    "ATI2",
    "ATI3",
    "AT+CAD?",
    "AT+CIMI",
    "AT+CGMI",
    "AT+CGMR",
    "AT+CGDCONT?",
    "AT+GMI",
    "AT+GMM",
    "AT+GMR",
    "AT+GSN",
    "AT+CBC",
    "AT+CBIP",
    "AT+CCED?",
    "AT+ESR",
    "AT+CIND=?",
    "AT+FCLASS=?",
    "AT+GCAP=?",
    "AT$SPMDN?",
    "AT$QCMIPGETP=1",
    "AT&V",
    "ATH",
];
