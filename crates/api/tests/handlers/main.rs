
mod admin_test;
mod availability_test;
mod bookings_test;
mod middleware_test;
