/*!
    PlayReady constants.

    - Microsoft's public test key seed and license server
    - Key seed length used by content key derivation
*/

/**
    Key seed published for Microsoft's PlayReady test server, base64.
*/
pub const TEST_KEY_SEED: &str = "XVBovsmzhP9gRIZxWfFta3VVRPzVEWmJsazEJ46I";

/**
    License acquisition URL of Microsoft's PlayReady test server.
*/
pub const TEST_LA_URL: &str = "https://test.playready.microsoft.com/service/rightsmanager.asmx";

/**
    Number of seed bytes consumed by content key derivation.
*/
pub const KEY_SEED_LEN: usize = 30;
