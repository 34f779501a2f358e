#[macro_use]
mod common;

#[cfg(test)]
mod _return {
    tests! {
        in_function in return is OK
        "yes"
        "no"
    }
}
