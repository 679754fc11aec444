//! Episode page fixtures and a throwaway local site to fetch them from.

use axum::Router;
use url::Url;

pub const PAYLOAD: &str = "W3sibGFuZ3VhZ2UiOiJIaW5kaSIsImxpbmsiOiJodHRwczpcL1wvc2hvcnQuaWN1XC9IX1p4YU9DeFAifSx7Imxhbmd1YWdlIjoiVGFtaWwiLCJsaW5rIjoiaHR0cHM6XC9cL3Nob3J0LmljdVwvVnBpZk5VVDVVIn0seyJsYW5ndWFnZSI6Ik1hbGF5YWxhbSIsImxpbmsiOiJodHRwczpcL1wvc2hvcnQuaWN1XC9OM3lGamFwVVMifSx7Imxhbmd1YWdlIjoiRW5nbGlzaCIsImxpbmsiOiJodHRwczpcL1wvc2hvcnQuaWN1XC9uOHlRR3FCZDcifSx7Imxhbmd1YWdlIjoiSmFwYW5lc2UiLCJsaW5rIjoiaHR0cHM6XC9cL3Nob3J0LmljdVwvcjhOcE5vTDU5In1d";

pub const PLAYER_URL: &str = "https://watchanimeworld.in/api/player1.php?data=W3sibGFuZ3VhZ2UiOiJIaW5kaSIsImxpbmsiOiJodHRwczpcL1wvc2hvcnQuaWN1XC9IX1p4YU9DeFAifSx7Imxhbmd1YWdlIjoiVGFtaWwiLCJsaW5rIjoiaHR0cHM6XC9cL3Nob3J0LmljdVwvVnBpZk5VVDVVIn0seyJsYW5ndWFnZSI6Ik1hbGF5YWxhbSIsImxpbmsiOiJodHRwczpcL1wvc2hvcnQuaWN1XC9OM3lGamFwVVMifSx7Imxhbmd1YWdlIjoiRW5nbGlzaCIsImxpbmsiOiJodHRwczpcL1wvc2hvcnQuaWN1XC9uOHlRR3FCZDcifSx7Imxhbmd1YWdlIjoiSmFwYW5lc2UiLCJsaW5rIjoiaHR0cHM6XC9cL3Nob3J0LmljdVwvcjhOcE5vTDU5In1d";

pub const EPISODE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><title>Naruto 1x1</title></head>
<body>
  <div class="video-options">
    <div id="options-1" class="video aa-tb hdd">
      <iframe data-src="https://watchanimeworld.in/api/player1.php?data=W3sibGFuZ3VhZ2UiOiJIaW5kaSIsImxpbmsiOiJodHRwczpcL1wvc2hvcnQuaWN1XC9IX1p4YU9DeFAifSx7Imxhbmd1YWdlIjoiVGFtaWwiLCJsaW5rIjoiaHR0cHM6XC9cL3Nob3J0LmljdVwvVnBpZk5VVDVVIn0seyJsYW5ndWFnZSI6Ik1hbGF5YWxhbSIsImxpbmsiOiJodHRwczpcL1wvc2hvcnQuaWN1XC9OM3lGamFwVVMifSx7Imxhbmd1YWdlIjoiRW5nbGlzaCIsImxpbmsiOiJodHRwczpcL1wvc2hvcnQuaWN1XC9uOHlRR3FCZDcifSx7Imxhbmd1YWdlIjoiSmFwYW5lc2UiLCJsaW5rIjoiaHR0cHM6XC9cL3Nob3J0LmljdVwvcjhOcE5vTDU5In1d" frameborder="0" scrolling="no" allow="autoplay; encrypted-media" allowfullscreen=""></iframe>
    </div>
    <div id="options-2" class="video aa-tb hdd">
      <iframe data-src="https://watchanimeworld.in/api/player2.php?id=1" frameborder="0"></iframe>
    </div>
  </div>
</body>
</html>
"#;

/// Episode page without a player frame, but with a direct video file.
pub const DIRECT_HTML: &str = r#"<html><body>
  <video controls><source src="https://cdn.example.com/naruto/1x1.mp4" type="video/mp4"></video>
</body></html>
"#;

pub const EXPECTED_LINKS: [&str; 5] = [
    "https://short.icu/H_ZxaOCxP",
    "https://short.icu/VpifNUT5U",
    "https://short.icu/N3yFjapUS",
    "https://short.icu/n8yQGqBd7",
    "https://short.icu/r8NpNoL59",
];

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn serve(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind fixture site");
    let addr = listener.local_addr().expect("fixture address");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("fixture site");
    });
    Url::parse(&format!("http://{}", addr)).expect("fixture url")
}
