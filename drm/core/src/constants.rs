use hex_literal::hex;

/**
    Widevine DRM System ID: `edef8ba9-79d6-4ace-a3c8-27dcd51d21ed`
*/
pub const WIDEVINE_SYSTEM_ID: [u8; 16] = hex!(
    "edef8ba9"
    "79d6"
    "4ace"
    "a3c8"
    "27dcd51d21ed"
);

/**
    PlayReady DRM System ID: `9a04f079-9840-4286-ab92-e65be0885f95`
*/
pub const PLAYREADY_SYSTEM_ID: [u8; 16] = hex!(
    "9a04f079"
    "9840"
    "4286"
    "ab92"
    "e65be0885f95"
);

/**
    Apple FairPlay DRM System ID: `94ce86fb-07ff-4f43-adb8-93d2fa968ca2`
*/
pub const FAIRPLAY_SYSTEM_ID: [u8; 16] = hex!(
    "94ce86fb"
    "07ff"
    "4f43"
    "adb8"
    "93d2fa968ca2"
);

/**
    W3C ClearKey System ID: `1077efec-c0b2-4d02-ace3-3c1e52e2fb4b`
*/
pub const CLEARKEY_SYSTEM_ID: [u8; 16] = hex!(
    "1077efec"
    "c0b2"
    "4d02"
    "ace3"
    "3c1e52e2fb4b"
);

/**
    Adobe Primetime DRM (version 4) System ID: `f239e769-efa3-4850-9c16-a903c6932efb`
*/
pub const PRIMETIME_SYSTEM_ID: [u8; 16] = hex!(
    "f239e769"
    "efa3"
    "4850"
    "9c16"
    "a903c6932efb"
);

/**
    Marlin DRM System ID: `5e629af5-38da-4063-8977-97ffbd9902d4`
*/
pub const MARLIN_SYSTEM_ID: [u8; 16] = hex!(
    "5e629af5"
    "38da"
    "4063"
    "8977"
    "97ffbd9902d4"
);

/**
    Verimatrix VCAS System ID: `9a27dd82-fde2-4725-8cbc-4234aa06ec09`
*/
pub const VERIMATRIX_SYSTEM_ID: [u8; 16] = hex!(
    "9a27dd82"
    "fde2"
    "4725"
    "8cbc"
    "4234aa06ec09"
);

/**
    Irdeto Content Protection System ID: `80a6be7e-1448-4c37-9e70-d5aebe04c8d2`
*/
pub const IRDETO_SYSTEM_ID: [u8; 16] = hex!(
    "80a6be7e"
    "1448"
    "4c37"
    "9e70"
    "d5aebe04c8d2"
);

/**
    Latens System ID: `279fe473-512c-48fe-ade8-d176fee6b40f`
*/
pub const LATENS_SYSTEM_ID: [u8; 16] = hex!(
    "279fe473"
    "512c"
    "48fe"
    "ade8"
    "d176fee6b40f"
);

/**
    Viaccess-Orca DRM (VODRM) System ID: `b4413586-c58c-ffb0-94a5-d4896c1af6c3`
*/
pub const VIACCESS_ORCA_SYSTEM_ID: [u8; 16] = hex!(
    "b4413586"
    "c58c"
    "ffb0"
    "94a5"
    "d4896c1af6c3"
);
