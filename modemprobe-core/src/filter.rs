use std::borrow::Cow;

/// HDLC frame flag. Once writes start with this, the link is doing PPP.
const PPP_FLAG: u8 = 0x7e;

/// Write-path filter that morphs PPP data into something the BlackBerry
/// side accepts: every frame must open with a 0x7e flag, and the device
/// chokes when a frame reuses the previous frame's closing flag. The
/// filter inserts the missing flag.
///
/// Until a write begins with 0x7e the filter is a pass-through; AT command
/// probing never trips it.
pub struct PppFilter {
    ppp_mode: bool,
    last: u8,
}

impl Default for PppFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl PppFilter {
    pub fn new() -> Self {
        Self {
            ppp_mode: false,
            last: PPP_FLAG,
        }
    }

    pub fn ppp_mode(&self) -> bool {
        self.ppp_mode
    }

    /// Filter one outgoing buffer. Borrows the input back untouched when
    /// there is nothing to do.
    pub fn write<'a>(&mut self, data: &'a [u8]) -> Cow<'a, [u8]> {
        if data.is_empty() {
            return Cow::Borrowed(data); // nothing to do
        }

        if !self.ppp_mode {
            if data[0] == PPP_FLAG {
                self.ppp_mode = true;
                // fall through
            } else {
                // not in ppp mode yet, so just pass the buffer
                // straight back to the caller
                return Cow::Borrowed(data);
            }
        }

        // worst case
        let mut out = Vec::with_capacity(data.len() / 2 * 3 + 4);
        let mut i = 0;

        while i < data.len() {
            // if last byte was 0x7e, then next one must be,
            // or else we insert it ourselves
            if self.last == PPP_FLAG {
                self.last = 0;
                if data[i] != PPP_FLAG {
                    out.push(PPP_FLAG);
                } else {
                    out.push(data[i]);
                    i += 1;
                }
            }

            // copy all non-0x7e bytes verbatim
            while i < data.len() && data[i] != PPP_FLAG {
                out.push(data[i]);
                i += 1;
            }

            if i < data.len() {
                // data[i] == 0x7e and must keep going
                out.push(data[i]);
                i += 1;
                self.last = PPP_FLAG;
            }
        }

        Cow::Owned(out)
    }
}
