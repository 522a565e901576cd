/// Perform a single fixed-step fourth-order Runge-Kutta step.
///
/// `f` evaluates the derivative of the state `y` at time `t`.
/// Returns the state advanced by `dt`.
pub fn rk4_step<const N: usize, F>(f: &F, t: f64, y: &[f64; N], dt: f64) -> [f64; N]
where
    F: Fn(f64, &[f64; N]) -> [f64; N],
{
    let k1 = f(t, y);

    let mut y_tmp = [0.0; N];
    for i in 0..N {
        y_tmp[i] = y[i] + 0.5 * dt * k1[i];
    }
    let k2 = f(t + 0.5 * dt, &y_tmp);

    for i in 0..N {
        y_tmp[i] = y[i] + 0.5 * dt * k2[i];
    }
    let k3 = f(t + 0.5 * dt, &y_tmp);

    for i in 0..N {
        y_tmp[i] = y[i] + dt * k3[i];
    }
    let k4 = f(t + dt, &y_tmp);

    let mut y_next = [0.0; N];
    for i in 0..N {
        y_next[i] = y[i] + (dt / 6.0) * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
    }
    y_next
}
