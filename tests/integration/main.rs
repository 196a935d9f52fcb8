//! Integration tests for the FoodShare donation core.


mod accept_test;
mod bootstrap_test;
mod create_test;
mod notification_test;
mod redonate_test;
mod visibility_test;
