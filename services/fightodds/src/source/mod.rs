pub mod bestfightodds;
pub mod html;
pub mod mock;
pub mod session;
pub mod traits;

pub use bestfightodds::{parse_fighter_page, parse_search_results, BestFightOdds};
pub use mock::{MockFixture, MockSource};
pub use session::FetchSession;
pub use traits::{FighterPage, OddsSource, SearchCandidate};
