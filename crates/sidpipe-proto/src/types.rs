//! Enumerated payload fields and their wire values.

use std::fmt;

use crate::error::{ProtoError, Result};

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $($(#[$vmeta:meta])* $variant:ident = $value:literal => $label:literal,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
        }

        impl $name {
            /// Every variant, in wire order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            pub const fn as_wire(self) -> u32 {
                match self {
                    $(Self::$variant => $value,)+
                }
            }

            pub fn from_wire(value: u32) -> Result<Self> {
                match value {
                    $($value => Ok(Self::$variant),)+
                    other => Err(ProtoError::InvalidValue {
                        field: $field,
                        value: other,
                    }),
                }
            }

            pub const fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

wire_enum! {
    /// Machine model the emulated C64 runs as.
    C64Model, "c64 model" {
        Pal = 1 => "PAL",
        Ntsc = 2 => "NTSC",
        OldNtsc = 3 => "old NTSC",
        Drean = 4 => "Drean",
    }
}

wire_enum! {
    /// SID chip revision.
    SidModel, "sid model" {
        Unknown = 0 => "unknown",
        Mos6581 = 1 => "MOS6581",
        Mos8580 = 2 => "MOS8580",
        Any = 3 => "any",
    }
}

wire_enum! {
    PlaybackMode, "playback mode" {
        Mono = 1 => "mono",
        Stereo = 2 => "stereo",
    }
}

wire_enum! {
    SamplingMethod, "sampling method" {
        Interpolate = 1 => "interpolate",
        ResampleInterpolate = 2 => "resample-interpolate",
    }
}

wire_enum! {
    /// SID emulation backend.
    SidEmulator, "sid emulator" {
        ReSid = 1 => "reSID",
        ReSidFp = 2 => "reSIDfp",
        /// Real hardware; accepted on the wire, rarely available.
        HardSid = 3 => "HardSID",
    }
}

wire_enum! {
    /// Environment a tune expects to run in.
    Compatibility, "compatibility" {
        C64 = 1 => "C64",
        Psid = 2 => "PSID",
        R64 = 3 => "R64",
        Basic = 4 => "BASIC",
    }
}

wire_enum! {
    /// How often the play routine is called.
    SongSpeed, "song speed" {
        VerticalBlank = 1 => "vertical blank",
        Cia = 2 => "CIA",
    }
}

wire_enum! {
    ClockSpeed, "clock speed" {
        Unknown = 1 => "unknown",
        Pal = 2 => "PAL",
        Ntsc = 3 => "NTSC",
        Any = 4 => "any",
    }
}
