macro_rules! impl_num_enums {
    ($(#[$meta:meta])* $tname:ident, $($(#[$vmeta:meta])* $vname:ident = $val:literal,)+) => {
        impl_num_enums!($(#[$meta])* $tname, u8, $($(#[$vmeta])* $vname = $val,)+);
    };

    ($(#[$meta:meta])* $tname:ident, $nty:ty, $($(#[$vmeta:meta])* $vname:ident = $val:literal,)+) => {
        $(#[$meta])*
        #[repr($nty)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $tname {
            $(
                $(#[$vmeta])*
                $vname = $val,
             )+
        }

        impl std::convert::TryFrom<$nty> for $tname {
            type Error = $crate::Error;

            fn try_from(val: $nty) -> Result<Self, Self::Error> {
                Ok(match val {
                    $(
                        $val => $tname::$vname,
                     )+
                    other => return Err($crate::Error::InvalidData(format!("unexpected value {} for {}", other, stringify!($tname)).into())),
                })
            }
        }
    };
}

pub(crate) use impl_num_enums;
