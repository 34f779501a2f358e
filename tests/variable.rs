#[macro_use]
mod common;

#[cfg(test)]
mod variable {
    tests! {
        uninitialized in variable is OK
        "nil"
    }

    tests! {
        redeclare_global in variable is OK
        "second"
    }

    tests! {
        use_global_in_function in variable is OK
        "global"
    }
}
